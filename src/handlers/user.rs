use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::{LoginRequest, RegisterRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/data", get(user_data))
        .route("/cars", get(public_cars))
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if request.name.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    let token = state.auth.register(&request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "User registered successfully",
        "token": token
    })))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = state.auth.login(&request.email, &request.password).await?;

    Ok(Json(json!({
        "success": true,
        "message": "User logged in successfully",
        "token": token
    })))
}

async fn user_data(AuthUser(user): AuthUser) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(json!({
        "success": true,
        "message": "User data fetched successfully",
        "user": user
    })))
}

/// Public catalog; no token required.
async fn public_cars(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let cars = state.cars.public_catalog().await?;

    Ok(Json(json!({
        "success": true,
        "message": "Cars fetched successfully",
        "cars": cars
    })))
}
