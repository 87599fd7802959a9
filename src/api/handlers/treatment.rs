use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateTreatmentRequest;
use crate::domain::models::treatment::Treatment;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_treatment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTreatmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Treatment name is required".into()));
    }
    if payload.min_duration_min.is_some_and(|m| m < 0) {
        return Err(AppError::Validation("Minimum duration cannot be negative".into()));
    }

    let treatment = Treatment::new(payload.name, payload.min_duration_min, payload.resource_required);
    let created = state.treatment_repo.create(&treatment).await?;
    info!("Created treatment: {} (resource required: {})", created.name, created.resource_required);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_treatments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.treatment_repo.list().await?))
}

pub async fn get_treatment(
    State(state): State<Arc<AppState>>,
    Path(treatment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let treatment = state.treatment_repo.find_by_id(&treatment_id).await?
        .ok_or(AppError::NotFound("Treatment not found".into()))?;
    Ok(Json(treatment))
}
