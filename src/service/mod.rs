pub mod auth;
pub mod booking;
pub mod cars;
pub mod images;

pub use auth::{authorize, Access, AuthService, TokenSigner};
pub use booking::BookingService;
pub use cars::CarService;
pub use images::ImageClient;

#[cfg(test)]
mod auth_test;
#[cfg(test)]
mod booking_test;
