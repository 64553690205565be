use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use super::{Car, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "confirmed")]
    Confirmed,
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown booking status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for BookingStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A reservation of one car over an inclusive date window. `owner_id` is a
/// snapshot of the car's owner taken at creation time and is intentionally
/// stale with respect to later ownership changes on the car.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: Uuid,
    #[serde(rename = "car")]
    pub car_id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    #[serde(rename = "pickupDate")]
    pub pickup_date: NaiveDate,
    #[serde(rename = "returnDate")]
    pub return_date: NaiveDate,
    pub price: i64,
    pub status: BookingStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for Booking {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        Ok(Booking {
            id: row.try_get("id")?,
            car_id: row.try_get("car_id")?,
            user_id: row.try_get("user_id")?,
            owner_id: row.try_get("owner_id")?,
            pickup_date: row.try_get("pickup_date")?,
            return_date: row.try_get("return_date")?,
            price: row.try_get("price")?,
            status: status
                .parse()
                .map_err(|e: ParseStatusError| sqlx::Error::ColumnDecode {
                    index: "status".into(),
                    source: Box::new(e),
                })?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Booking as returned by the renter-facing listing: the car reference is
/// expanded into the full car record.
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithCar {
    pub id: Uuid,
    pub car: Car,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    #[serde(rename = "pickupDate")]
    pub pickup_date: NaiveDate,
    #[serde(rename = "returnDate")]
    pub return_date: NaiveDate,
    pub price: i64,
    pub status: BookingStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Booking as returned by the owner-facing listing: both the car and the
/// renter are expanded. `User` serialization skips the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerBooking {
    pub id: Uuid,
    pub car: Car,
    pub user: User,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    #[serde(rename = "pickupDate")]
    pub pickup_date: NaiveDate,
    #[serde(rename = "returnDate")]
    pub return_date: NaiveDate,
    pub price: i64,
    pub status: BookingStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CheckAvailabilityRequest {
    pub location: String,
    #[serde(rename = "pickupDate")]
    pub pickup_date: NaiveDate,
    #[serde(rename = "returnDate")]
    pub return_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(rename = "car")]
    pub car_id: Uuid,
    #[serde(rename = "pickupDate")]
    pub pickup_date: NaiveDate,
    #[serde(rename = "returnDate")]
    pub return_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    #[serde(rename = "bookingId")]
    pub booking_id: Uuid,
    pub status: BookingStatus,
}

/// Owner dashboard aggregates.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    #[serde(rename = "totalCars")]
    pub total_cars: i64,
    #[serde(rename = "totalBookings")]
    pub total_bookings: i64,
    #[serde(rename = "pendingBookings")]
    pub pending_bookings: i64,
    #[serde(rename = "completedBookings")]
    pub completed_bookings: i64,
    #[serde(rename = "recentBookings")]
    pub recent_bookings: Vec<BookingWithCar>,
    #[serde(rename = "monthlyRevenue")]
    pub monthly_revenue: i64,
}
