use sqlx::PgPool;

use crate::config::Config;
use crate::repository::{BookingRepository, CarRepository, UserRepository};
use crate::service::{AuthService, BookingService, CarService, ImageClient, TokenSigner};

/// Shared application state: one service per handler group, all cheaply
/// cloneable over the same connection pool.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub bookings: BookingService,
    pub cars: CarService,
    pub images: ImageClient,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let users = UserRepository::new(pool.clone());
        let car_repo = CarRepository::new(pool.clone());
        let booking_repo = BookingRepository::new(pool);
        let signer = TokenSigner::new(&config.jwt_secret);
        let images = ImageClient::new(
            config.imagekit_upload_url.clone(),
            config.imagekit_url_endpoint.clone(),
            config.imagekit_private_key.clone(),
        );

        AppState {
            auth: AuthService::new(users, signer),
            bookings: BookingService::new(booking_repo.clone(), car_repo.clone()),
            cars: CarService::new(car_repo, booking_repo, images.clone()),
            images,
        }
    }
}
