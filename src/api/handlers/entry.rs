use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::editor::ActingEditor;
use crate::api::dtos::requests::{CreateEntryRequest, DayQuery, MoveEntryRequest, UpdateEntryRequest};
use crate::api::dtos::responses::{DayListingResponse, EntryView};
use crate::domain::models::entry::{Entry, NewEntryParams};
use crate::domain::services::{entry_service::StatusAction, statistics::Statistics};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Attaches the display label to each entry, resolving resources once.
pub(crate) async fn entry_views(state: &AppState, entries: Vec<Entry>) -> Result<Vec<EntryView>, AppError> {
    let resources: HashMap<_, _> = state.resource_repo.list().await?
        .into_iter()
        .map(|r| (r.id.clone(), r))
        .collect();

    Ok(entries.into_iter().map(|entry| {
        let resource = entry.resource_id.as_ref().and_then(|id| resources.get(id));
        let short = entry.short(resource);
        EntryView { entry, short }
    }).collect())
}

async fn entry_view(state: &AppState, entry: Entry) -> Result<EntryView, AppError> {
    let resource = match &entry.resource_id {
        Some(id) => state.resource_repo.find_by_id(id).await?,
        None => None,
    };
    let short = entry.short(resource.as_ref());
    Ok(EntryView { entry, short })
}

pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    ActingEditor(editor): ActingEditor,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let entry = Entry::new(NewEntryParams {
        date: payload.date,
        time: payload.time,
        duration_min: payload.duration_min,
        notes: payload.notes,
        customer_id: payload.customer_id,
        treatment_id: payload.treatment_id,
        resource_id: payload.resource_id,
    });

    let created = state.entry_service.create(entry, &editor).await?;
    Ok((StatusCode::CREATED, Json(entry_view(&state, created).await?)))
}

pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DayQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entries = state.entry_repo.list_by_date(query.date).await?;
    let statistics = Statistics::collect(&entries);

    Ok(Json(DayListingResponse {
        date: query.date,
        entries: entry_views(&state, entries).await?,
        statistics,
    }))
}

pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(entry_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.entry_service.find(&entry_id).await?;
    Ok(Json(entry_view(&state, entry).await?))
}

pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    ActingEditor(editor): ActingEditor,
    Path(entry_id): Path<String>,
    Json(payload): Json<UpdateEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut entry = state.entry_service.find(&entry_id).await?;
    entry.date = payload.date;
    entry.time = payload.time;
    entry.duration_min = payload.duration_min;
    entry.notes = payload.notes;
    entry.customer_id = payload.customer_id;
    entry.treatment_id = payload.treatment_id;
    entry.resource_id = payload.resource_id;
    entry.cancelled = payload.cancelled;
    entry.no_show = payload.no_show;

    let updated = state.entry_service.update(entry, &editor).await?;
    Ok(Json(entry_view(&state, updated).await?))
}

pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    ActingEditor(editor): ActingEditor,
    Path(entry_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !editor.is_staff {
        return Err(AppError::Forbidden("Only staff can delete entries".into()));
    }
    state.entry_service.delete(&entry_id).await?;
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn move_entry(
    State(state): State<Arc<AppState>>,
    ActingEditor(editor): ActingEditor,
    Path(entry_id): Path<String>,
    Json(payload): Json<MoveEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let moved = state.entry_service.move_entry(&entry_id, payload.date, payload.time, &editor).await?;
    info!(entry_id = %moved.id, "Entry moved to {} {}", moved.date, moved.time);
    Ok(Json(entry_view(&state, moved).await?))
}

pub async fn set_entry_status(
    State(state): State<Arc<AppState>>,
    ActingEditor(editor): ActingEditor,
    Path((entry_id, action)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let action: StatusAction = action.parse()?;
    let updated = state.entry_service.set_status(&entry_id, action, &editor).await?;
    Ok(Json(entry_view(&state, updated).await?))
}
