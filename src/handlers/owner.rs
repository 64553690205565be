use axum::{
    extract::{Multipart, Path, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::models::{CarIdRequest, CarPayload};
use crate::service::images::AVATAR_TRANSFORM;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/change-role", post(change_role))
        .route("/add-car", post(add_car))
        .route("/cars", get(owner_cars))
        .route("/toggle-car", post(toggle_car))
        .route("/delete-car", post(soft_delete_car))
        .route("/delete-car/:id", delete(delete_car_permanently))
        .route("/dashboard", get(dashboard))
        .route("/update-image", post(update_image))
}

async fn change_role(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    state.auth.promote_to_owner(user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Role changed to owner successfully"
    })))
}

/// Multipart form: a `carData` JSON part with the structured fields and an
/// `image` file part forwarded to the image service.
async fn add_car(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let (car_data, image_bytes, image_name) = read_car_form(multipart).await?;

    let car = state
        .cars
        .add_car(&user, &car_data, image_bytes, &image_name)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Car added successfully",
        "car": car
    })))
}

async fn owner_cars(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let cars = state.cars.cars_for_owner(&user).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Cars fetched successfully",
        "cars": cars
    })))
}

async fn toggle_car(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CarIdRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let car = state.cars.toggle_availability(&user, request.car_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Car availability toggled successfully",
        "car": car
    })))
}

async fn soft_delete_car(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CarIdRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.cars.unlist(&user, request.car_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Car removed"
    })))
}

async fn delete_car_permanently(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.cars.delete(&user, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Car permanently deleted"
    })))
}

async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let dashboard_data = state.cars.dashboard(&user).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Dashboard data fetched successfully",
        "dashboardData": dashboard_data
    })))
}

/// Avatar upload: any authenticated user, not only owners.
async fn update_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let (image_bytes, image_name) = read_image_part(multipart).await?;

    let image_url = state
        .images
        .upload(image_bytes, &image_name, "/users", AVATAR_TRANSFORM)
        .await?;
    state.auth.update_avatar(user.id, &image_url).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Image updated successfully",
        "image": image_url
    })))
}

async fn read_car_form(
    mut multipart: Multipart,
) -> Result<(CarPayload, Vec<u8>, String), AppError> {
    let mut car_data: Option<CarPayload> = None;
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("carData") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid carData: {}", e)))?;
                let payload = serde_json::from_str(&text)
                    .map_err(|e| AppError::Validation(format!("Invalid carData: {}", e)))?;
                car_data = Some(payload);
            }
            Some("image") => {
                let name = field
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid image: {}", e)))?;
                image = Some((bytes.to_vec(), name));
            }
            _ => {}
        }
    }

    let car_data =
        car_data.ok_or_else(|| AppError::Validation("carData is required".to_string()))?;
    let (image_bytes, image_name) =
        image.ok_or_else(|| AppError::Validation("Image file is required".to_string()))?;
    Ok((car_data, image_bytes, image_name))
}

async fn read_image_part(mut multipart: Multipart) -> Result<(Vec<u8>, String), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some("image") {
            let name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid image: {}", e)))?;
            return Ok((bytes.to_vec(), name));
        }
    }
    Err(AppError::Validation("Image file is required".to_string()))
}
