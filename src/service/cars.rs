use uuid::Uuid;

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::{BookingStatus, Car, CarPayload, DashboardData, User};
use crate::repository::{BookingRepository, CarRepository};
use crate::service::auth::{authorize, Access};
use crate::service::images::{ImageClient, CAR_IMAGE_TRANSFORM};

const RECENT_BOOKINGS_LIMIT: i64 = 3;

#[derive(Clone)]
pub struct CarService {
    cars: CarRepository,
    bookings: BookingRepository,
    images: ImageClient,
}

impl CarService {
    pub fn new(cars: CarRepository, bookings: BookingRepository, images: ImageClient) -> Self {
        Self {
            cars,
            bookings,
            images,
        }
    }

    /// Uploads the listing image, then persists the car under the caller.
    pub async fn add_car(
        &self,
        owner: &User,
        payload: &CarPayload,
        image_bytes: Vec<u8>,
        image_name: &str,
    ) -> Result<Car, AppError> {
        authorize(owner, Access::OwnerRole)?;

        if payload.price_per_day <= 0 {
            return Err(AppError::Validation(
                "pricePerDay must be positive".to_string(),
            ));
        }

        let image_url = self
            .images
            .upload(image_bytes, image_name, "/cars", CAR_IMAGE_TRANSFORM)
            .await?;

        let car = self.cars.create(owner.id, payload, &image_url).await?;
        tracing::info!("{} Owner {} listed car {}", API_NAME, owner.id, car.id);
        Ok(car)
    }

    /// Public catalog of every car currently marked available.
    pub async fn public_catalog(&self) -> Result<Vec<Car>, AppError> {
        Ok(self.cars.list_available().await?)
    }

    pub async fn cars_for_owner(&self, owner: &User) -> Result<Vec<Car>, AppError> {
        authorize(owner, Access::OwnerRole)?;
        Ok(self.cars.list_by_owner(owner.id).await?)
    }

    pub async fn toggle_availability(&self, caller: &User, car_id: Uuid) -> Result<Car, AppError> {
        let car = self.find_owned(caller, car_id).await?;
        let updated = self.cars.set_availability(car_id, !car.is_available).await?;
        tracing::info!(
            "{} Car {} availability toggled to {}",
            API_NAME,
            car_id,
            updated.is_available
        );
        Ok(updated)
    }

    /// Soft-unlist: the owner reference is cleared and availability forced
    /// off. The record stays for existing bookings to reference.
    pub async fn unlist(&self, caller: &User, car_id: Uuid) -> Result<(), AppError> {
        self.find_owned(caller, car_id).await?;
        self.cars.unlist(car_id).await?;
        tracing::info!("{} Car {} soft-unlisted", API_NAME, car_id);
        Ok(())
    }

    /// Hard delete. Permitted to the current owner, or to any authenticated
    /// caller for a car that is already unlisted (its owner slot is empty, so
    /// no stricter check is possible). Bookings are never deleted, so a car
    /// any booking still references cannot be removed.
    pub async fn delete(&self, caller: &User, car_id: Uuid) -> Result<(), AppError> {
        let car = self
            .cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        if let Some(owner_id) = car.owner_id {
            authorize(caller, Access::OwnerOf(Some(owner_id)))?;
        }

        self.cars.delete(car_id).await.map_err(|e| {
            if CarRepository::check_referenced_error(&e).is_some() {
                AppError::Conflict(
                    "Car has bookings and cannot be deleted".to_string(),
                )
            } else {
                AppError::Database(e)
            }
        })?;
        tracing::info!("{} Car {} permanently deleted", API_NAME, car_id);
        Ok(())
    }

    pub async fn dashboard(&self, owner: &User) -> Result<DashboardData, AppError> {
        authorize(owner, Access::OwnerRole)?;

        let total_cars = self.cars.count_by_owner(owner.id).await?;
        let total_bookings = self.bookings.count_for_owner(owner.id).await?;
        let pending_bookings = self
            .bookings
            .count_for_owner_with_status(owner.id, BookingStatus::Pending)
            .await?;
        let completed_bookings = self
            .bookings
            .count_for_owner_with_status(owner.id, BookingStatus::Confirmed)
            .await?;
        let recent_bookings = self
            .bookings
            .recent_for_owner(owner.id, RECENT_BOOKINGS_LIMIT)
            .await?;
        let monthly_revenue = self.bookings.confirmed_revenue_for_owner(owner.id).await?;

        Ok(DashboardData {
            total_cars,
            total_bookings,
            pending_bookings,
            completed_bookings,
            recent_bookings,
            monthly_revenue,
        })
    }

    async fn find_owned(&self, caller: &User, car_id: Uuid) -> Result<Car, AppError> {
        let car = self
            .cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;
        authorize(caller, Access::OwnerOf(car.owner_id))?;
        Ok(car)
    }
}
