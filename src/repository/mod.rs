pub mod booking_repo;
pub mod car_repo;
pub mod user_repo;

pub use booking_repo::BookingRepository;
pub use car_repo::CarRepository;
pub use user_repo::UserRepository;
