use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use uuid::Uuid;

use crate::models::booking::ParseStatusError;
use crate::models::user::ParseRoleError;
use crate::models::{Booking, BookingStatus, BookingWithCar, Car, OwnerBooking, User};

const BOOKING_COLUMNS: &str =
    "id, car_id, user_id, owner_id, pickup_date, return_date, price, status, created_at";

/// Booking columns plus the joined car record, car columns aliased `car_*`.
const BOOKING_WITH_CAR_SELECT: &str = "SELECT b.id, b.car_id, b.user_id, b.owner_id, \
     b.pickup_date, b.return_date, b.price, b.status, b.created_at, \
     c.id AS car_row_id, c.owner_id AS car_owner_id, c.brand AS car_brand, \
     c.model AS car_model, c.image AS car_image, c.year AS car_year, \
     c.category AS car_category, c.seating_capacity AS car_seating_capacity, \
     c.fuel_type AS car_fuel_type, c.transmission AS car_transmission, \
     c.price_per_day AS car_price_per_day, c.location AS car_location, \
     c.description AS car_description, c.is_available AS car_is_available, \
     c.created_at AS car_created_at, c.updated_at AS car_updated_at \
     FROM bookings b JOIN cars c ON c.id = b.car_id";

fn car_from_aliased_row(row: &PgRow) -> Result<Car, sqlx::Error> {
    Ok(Car {
        id: row.try_get("car_row_id")?,
        owner_id: row.try_get("car_owner_id")?,
        brand: row.try_get("car_brand")?,
        model: row.try_get("car_model")?,
        image: row.try_get("car_image")?,
        year: row.try_get("car_year")?,
        category: row.try_get("car_category")?,
        seating_capacity: row.try_get("car_seating_capacity")?,
        fuel_type: row.try_get("car_fuel_type")?,
        transmission: row.try_get("car_transmission")?,
        price_per_day: row.try_get("car_price_per_day")?,
        location: row.try_get("car_location")?,
        description: row.try_get("car_description")?,
        is_available: row.try_get("car_is_available")?,
        created_at: row.try_get("car_created_at")?,
        updated_at: row.try_get("car_updated_at")?,
    })
}

fn status_from_row(row: &PgRow) -> Result<BookingStatus, sqlx::Error> {
    let status: String = row.try_get("status")?;
    BookingStatus::from_str(&status).map_err(|e: ParseStatusError| sqlx::Error::ColumnDecode {
        index: "status".into(),
        source: Box::new(e),
    })
}

fn booking_with_car_from_row(row: &PgRow) -> Result<BookingWithCar, sqlx::Error> {
    Ok(BookingWithCar {
        id: row.try_get("id")?,
        car: car_from_aliased_row(row)?,
        user_id: row.try_get("user_id")?,
        owner_id: row.try_get("owner_id")?,
        pickup_date: row.try_get("pickup_date")?,
        return_date: row.try_get("return_date")?,
        price: row.try_get("price")?,
        status: status_from_row(row)?,
        created_at: row.try_get("created_at")?,
    })
}

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        car_id: Uuid,
        user_id: Uuid,
        owner_id: Uuid,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
        price: i64,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (car_id, user_id, owner_id, pickup_date, return_date, price) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {BOOKING_COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(car_id)
            .bind(user_id)
            .bind(owner_id)
            .bind(pickup_date)
            .bind(return_date)
            .bind(price)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Active (non-cancelled) bookings for one car whose inclusive date window
    /// intersects `[pickup_date, return_date]`.
    pub async fn find_overlapping(
        &self,
        car_id: Uuid,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE car_id = $1 AND pickup_date <= $3 AND return_date >= $2 \
             AND status <> 'cancelled'"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(car_id)
            .bind(pickup_date)
            .bind(return_date)
            .fetch_all(&self.pool)
            .await
    }

    /// Active date windows of every booking against the given cars, fetched in
    /// one round trip for the location-wide availability fan-out.
    pub async fn active_windows_for_cars(
        &self,
        car_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, NaiveDate, NaiveDate)>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT car_id, pickup_date, return_date FROM bookings
             WHERE car_id = ANY($1) AND status <> 'cancelled'",
        )
        .bind(car_ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok((
                    row.try_get("car_id")?,
                    row.try_get("pickup_date")?,
                    row.try_get("return_date")?,
                ))
            })
            .collect()
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<BookingWithCar>, sqlx::Error> {
        let query = format!("{BOOKING_WITH_CAR_SELECT} WHERE b.user_id = $1 ORDER BY b.created_at DESC");
        let rows = sqlx::query(&query).bind(user_id).fetch_all(&self.pool).await?;
        rows.iter().map(booking_with_car_from_row).collect()
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<OwnerBooking>, sqlx::Error> {
        let query = "SELECT b.id, b.car_id, b.user_id, b.owner_id, \
             b.pickup_date, b.return_date, b.price, b.status, b.created_at, \
             c.id AS car_row_id, c.owner_id AS car_owner_id, c.brand AS car_brand, \
             c.model AS car_model, c.image AS car_image, c.year AS car_year, \
             c.category AS car_category, c.seating_capacity AS car_seating_capacity, \
             c.fuel_type AS car_fuel_type, c.transmission AS car_transmission, \
             c.price_per_day AS car_price_per_day, c.location AS car_location, \
             c.description AS car_description, c.is_available AS car_is_available, \
             c.created_at AS car_created_at, c.updated_at AS car_updated_at, \
             u.id AS renter_id, u.name AS renter_name, u.email AS renter_email, \
             u.role AS renter_role, u.image AS renter_image, \
             u.created_at AS renter_created_at, u.updated_at AS renter_updated_at \
             FROM bookings b \
             JOIN cars c ON c.id = b.car_id \
             JOIN users u ON u.id = b.user_id \
             WHERE b.owner_id = $1 ORDER BY b.created_at DESC";
        let rows = sqlx::query(query).bind(owner_id).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                let role: String = row.try_get("renter_role")?;
                let user = User {
                    id: row.try_get("renter_id")?,
                    name: row.try_get("renter_name")?,
                    email: row.try_get("renter_email")?,
                    password_hash: String::new(),
                    role: role.parse().map_err(|e: ParseRoleError| {
                        sqlx::Error::ColumnDecode {
                            index: "renter_role".into(),
                            source: Box::new(e),
                        }
                    })?,
                    image: row.try_get("renter_image")?,
                    created_at: row.try_get("renter_created_at")?,
                    updated_at: row.try_get("renter_updated_at")?,
                };
                Ok(OwnerBooking {
                    id: row.try_get("id")?,
                    car: car_from_aliased_row(row)?,
                    user,
                    owner_id: row.try_get("owner_id")?,
                    pickup_date: row.try_get("pickup_date")?,
                    return_date: row.try_get("return_date")?,
                    price: row.try_get("price")?,
                    status: status_from_row(row)?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }

    pub async fn recent_for_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
    ) -> Result<Vec<BookingWithCar>, sqlx::Error> {
        let query = format!(
            "{BOOKING_WITH_CAR_SELECT} WHERE b.owner_id = $1 ORDER BY b.created_at DESC LIMIT $2"
        );
        let rows = sqlx::query(&query)
            .bind(owner_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(booking_with_car_from_row).collect()
    }

    pub async fn count_for_owner(&self, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn count_for_owner_with_status(
        &self,
        owner_id: Uuid,
        status: BookingStatus,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE owner_id = $1 AND status = $2",
        )
        .bind(owner_id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn confirmed_revenue_for_owner(&self, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(price), 0)::BIGINT FROM bookings
             WHERE owner_id = $1 AND status = 'confirmed'",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE bookings SET status = $1, updated_at = now() WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Exclusion-constraint violation on the no-overlap constraint, surfaced
    /// so a lost check-then-act race still becomes a conflict response.
    pub fn check_overlap_error(err: &sqlx::Error) -> Option<String> {
        if let sqlx::Error::Database(db_err) = err {
            if db_err.code().as_deref() == Some("23P01") {
                return Some(db_err.message().to_string());
            }
        }
        None
    }
}
