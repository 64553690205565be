use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// A rental listing. `owner_id` of `None` marks a soft-unlisted car; such a
/// car is also forced unavailable and never appears in the public catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Car {
    pub id: Uuid,
    #[serde(rename = "owner")]
    pub owner_id: Option<Uuid>,
    pub brand: String,
    pub model: String,
    pub image: String,
    pub year: i32,
    pub category: String,
    pub seating_capacity: i32,
    pub fuel_type: String,
    pub transmission: String,
    #[serde(rename = "pricePerDay")]
    pub price_per_day: i64,
    pub location: String,
    pub description: String,
    #[serde(rename = "isAvailable")]
    pub is_available: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for Car {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Car {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            brand: row.try_get("brand")?,
            model: row.try_get("model")?,
            image: row.try_get("image")?,
            year: row.try_get("year")?,
            category: row.try_get("category")?,
            seating_capacity: row.try_get("seating_capacity")?,
            fuel_type: row.try_get("fuel_type")?,
            transmission: row.try_get("transmission")?,
            price_per_day: row.try_get("price_per_day")?,
            location: row.try_get("location")?,
            description: row.try_get("description")?,
            is_available: row.try_get("is_available")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Structured fields of the `carData` multipart part on add-car; the image
/// URL is filled in after the upload to the image service.
#[derive(Debug, Clone, Deserialize)]
pub struct CarPayload {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub category: String,
    pub seating_capacity: i32,
    pub fuel_type: String,
    pub transmission: String,
    #[serde(rename = "pricePerDay")]
    pub price_per_day: i64,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CarIdRequest {
    #[serde(rename = "carId")]
    pub car_id: Uuid,
}
