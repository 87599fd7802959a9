use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateResourceRequest;
use crate::domain::models::resource::{Resource, MAX_NAME_LEN};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_resource(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!("Resource name must be 1 to {} characters", MAX_NAME_LEN)));
    }

    let resource = Resource::new(name, payload.description.unwrap_or_default());
    let created = state.resource_repo.create(&resource).await?;
    info!("Created resource: {}", created.name);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_resources(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.resource_repo.list().await?))
}

pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    Path(resource_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let resource = state.resource_repo.find_by_id(&resource_id).await?
        .ok_or(AppError::NotFound("Resource not found".into()))?;
    Ok(Json(resource))
}
