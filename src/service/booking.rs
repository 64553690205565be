use chrono::NaiveDate;
use uuid::Uuid;

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::{
    Booking, BookingStatus, BookingWithCar, Car, OwnerBooking, User,
};
use crate::repository::{BookingRepository, CarRepository};
use crate::service::auth::{authorize, Access};

/// Closed-interval overlap: a return on the same day as a new pickup counts
/// as a conflict.
pub fn windows_overlap(
    a_pickup: NaiveDate,
    a_return: NaiveDate,
    b_pickup: NaiveDate,
    b_return: NaiveDate,
) -> bool {
    a_pickup <= b_return && a_return >= b_pickup
}

pub fn rental_days(pickup_date: NaiveDate, return_date: NaiveDate) -> i64 {
    (return_date - pickup_date).num_days()
}

/// Price is fixed at creation time: whole rental days times the car's daily
/// rate, never recomputed afterwards.
pub fn rental_price(price_per_day: i64, pickup_date: NaiveDate, return_date: NaiveDate) -> i64 {
    price_per_day * rental_days(pickup_date, return_date)
}

/// A requested window must cover at least one rental day.
pub fn validate_window(pickup_date: NaiveDate, return_date: NaiveDate) -> Result<(), AppError> {
    if return_date <= pickup_date {
        return Err(AppError::Validation(
            "Return date must be after pickup date".to_string(),
        ));
    }
    Ok(())
}

/// Only `pending` bookings may move, and only to a terminal status.
pub fn validate_transition(
    current: BookingStatus,
    requested: BookingStatus,
) -> Result<(), AppError> {
    match (current, requested) {
        (BookingStatus::Pending, BookingStatus::Confirmed)
        | (BookingStatus::Pending, BookingStatus::Cancelled) => Ok(()),
        _ => Err(AppError::Conflict(format!(
            "Cannot change a {} booking to {}",
            current.as_str(),
            requested.as_str()
        ))),
    }
}

#[derive(Clone)]
pub struct BookingService {
    bookings: BookingRepository,
    cars: CarRepository,
}

impl BookingService {
    pub fn new(bookings: BookingRepository, cars: CarRepository) -> Self {
        Self { bookings, cars }
    }

    /// True when no active booking for the car overlaps the window.
    /// Cancelled bookings release their slot.
    pub async fn is_available(
        &self,
        car_id: Uuid,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let conflicts = self
            .bookings
            .find_overlapping(car_id, pickup_date, return_date)
            .await?;
        Ok(conflicts.is_empty())
    }

    /// Location-wide fan-out: every available car at the location with no
    /// active booking overlapping the window, in catalog listing order. The
    /// booked windows are fetched in one round trip and each car is evaluated
    /// independently against them.
    pub async fn available_cars(
        &self,
        location: &str,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Result<Vec<Car>, AppError> {
        validate_window(pickup_date, return_date)?;

        let cars = self.cars.list_available_by_location(location).await?;
        let car_ids: Vec<Uuid> = cars.iter().map(|car| car.id).collect();
        let windows = self.bookings.active_windows_for_cars(&car_ids).await?;

        let available = cars
            .into_iter()
            .filter(|car| {
                !windows.iter().any(|(car_id, booked_pickup, booked_return)| {
                    *car_id == car.id
                        && windows_overlap(*booked_pickup, *booked_return, pickup_date, return_date)
                })
            })
            .collect();
        Ok(available)
    }

    /// Creates a `pending` booking after the availability check, snapshotting
    /// the car's owner at this moment. The no-overlap exclusion constraint
    /// backstops the window between check and insert.
    pub async fn create(
        &self,
        renter: &User,
        car_id: Uuid,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Result<Booking, AppError> {
        validate_window(pickup_date, return_date)?;

        if !self.is_available(car_id, pickup_date, return_date).await? {
            return Err(AppError::Conflict(
                "Car is not available for the given date range".to_string(),
            ));
        }

        let car = self
            .cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        // Unlisted cars have no owner to book against.
        let owner_id = car.owner_id.ok_or_else(|| {
            AppError::Conflict("Car is not available for the given date range".to_string())
        })?;

        let price = rental_price(car.price_per_day, pickup_date, return_date);

        let booking = self
            .bookings
            .create(car_id, renter.id, owner_id, pickup_date, return_date, price)
            .await
            .map_err(|e| {
                if BookingRepository::check_overlap_error(&e).is_some() {
                    AppError::Conflict(
                        "Car is not available for the given date range".to_string(),
                    )
                } else {
                    AppError::Database(e)
                }
            })?;

        tracing::info!(
            "{} Created booking {} for car {} ({} - {})",
            API_NAME,
            booking.id,
            car_id,
            pickup_date,
            return_date
        );
        Ok(booking)
    }

    pub async fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<BookingWithCar>, AppError> {
        Ok(self.bookings.list_for_user(user_id).await?)
    }

    pub async fn bookings_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<OwnerBooking>, AppError> {
        Ok(self.bookings.list_for_owner(owner_id).await?)
    }

    /// Status transition, permitted only to the user snapshotted as the
    /// booking's owner.
    pub async fn change_status(
        &self,
        caller: &User,
        booking_id: Uuid,
        requested: BookingStatus,
    ) -> Result<(), AppError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        authorize(caller, Access::OwnerOf(Some(booking.owner_id)))?;
        validate_transition(booking.status, requested)?;

        self.bookings.update_status(booking_id, requested).await?;
        tracing::info!(
            "{} Booking {} moved from {} to {}",
            API_NAME,
            booking_id,
            booking.status.as_str(),
            requested.as_str()
        );
        Ok(())
    }
}
