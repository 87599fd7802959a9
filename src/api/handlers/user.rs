use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateUserRequest;
use crate::domain::models::user::User;
use crate::domain::services::credentials::hash_password;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if state.user_repo.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let user = User::new(payload.username, hash_password(&payload.password)?, payload.is_staff);
    let created = state.user_repo.create(&user).await?;

    info!("Created user: {} (staff: {})", created.id, created.is_staff);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.user_repo.list().await?))
}
