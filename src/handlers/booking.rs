use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::{ChangeStatusRequest, CheckAvailabilityRequest, CreateBookingRequest};
use crate::service::{authorize, Access};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/check-availability", post(check_availability))
        .route("/user", get(user_bookings))
        .route("/owner", get(owner_bookings))
        .route("/change-status", post(change_status))
}

/// Location-wide availability fan-out; open to unauthenticated shoppers.
async fn check_availability(
    State(state): State<AppState>,
    Json(request): Json<CheckAvailabilityRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let available_cars = state
        .bookings
        .available_cars(&request.location, request.pickup_date, request.return_date)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Availability fetched successfully",
        "availableCars": available_cars
    })))
}

async fn create_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let booking = state
        .bookings
        .create(&user, request.car_id, request.pickup_date, request.return_date)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Booking created successfully",
        "booking": booking
    })))
}

async fn user_bookings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let bookings = state.bookings.bookings_for_user(user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "User bookings fetched successfully",
        "bookings": bookings
    })))
}

async fn owner_bookings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    authorize(&user, Access::OwnerRole)?;
    let bookings = state.bookings.bookings_for_owner(user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Owner bookings fetched successfully",
        "bookings": bookings
    })))
}

async fn change_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .bookings
        .change_status(&user, request.booking_id, request.status)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Booking status updated successfully"
    })))
}
