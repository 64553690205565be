use crate::models::{Car, CarPayload};
use sqlx::PgPool;
use uuid::Uuid;

const CAR_COLUMNS: &str = "id, owner_id, brand, model, image, year, category, seating_capacity, \
     fuel_type, transmission, price_per_day, location, description, is_available, \
     created_at, updated_at";

#[derive(Clone)]
pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        payload: &CarPayload,
        image_url: &str,
    ) -> Result<Car, sqlx::Error> {
        let query = format!(
            "INSERT INTO cars (owner_id, brand, model, image, year, category, seating_capacity, \
             fuel_type, transmission, price_per_day, location, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {CAR_COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(owner_id)
            .bind(&payload.brand)
            .bind(&payload.model)
            .bind(image_url)
            .bind(payload.year)
            .bind(&payload.category)
            .bind(payload.seating_capacity)
            .bind(&payload.fuel_type)
            .bind(&payload.transmission)
            .bind(payload.price_per_day)
            .bind(&payload.location)
            .bind(&payload.description)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, sqlx::Error> {
        let query = format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = $1");
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Public catalog: every car currently marked available.
    pub async fn list_available(&self) -> Result<Vec<Car>, sqlx::Error> {
        let query =
            format!("SELECT {CAR_COLUMNS} FROM cars WHERE is_available ORDER BY created_at DESC");
        sqlx::query_as::<_, Car>(&query).fetch_all(&self.pool).await
    }

    pub async fn list_available_by_location(
        &self,
        location: &str,
    ) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!(
            "SELECT {CAR_COLUMNS} FROM cars WHERE location = $1 AND is_available \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(location)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!(
            "SELECT {CAR_COLUMNS} FROM cars WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cars WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn set_availability(&self, id: Uuid, is_available: bool) -> Result<Car, sqlx::Error> {
        let query = format!(
            "UPDATE cars SET is_available = $1, updated_at = now() WHERE id = $2 \
             RETURNING {CAR_COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(is_available)
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// Soft-unlist: clear the owner and force unavailability in one write.
    pub async fn unlist(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE cars SET owner_id = NULL, is_available = FALSE, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Hard delete. Returns false when no row matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Foreign-key violation on the delete, surfaced so the service can turn
    /// a car that bookings still reference into a business error.
    pub fn check_referenced_error(err: &sqlx::Error) -> Option<String> {
        if let sqlx::Error::Database(db_err) = err {
            if db_err.code().as_deref() == Some("23503") {
                return Some(db_err.message().to_string());
            }
        }
        None
    }
}
