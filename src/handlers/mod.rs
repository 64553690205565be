pub mod booking;
pub mod health;
pub mod owner;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Full application router; also used by the integration tests.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/user", user::router())
        .nest("/api/owner", owner::router())
        .nest("/api/bookings", booking::router())
        .with_state(state)
}
