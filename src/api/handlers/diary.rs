use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::editor::ActingEditor;
use crate::api::dtos::requests::RangeQuery;
use crate::api::dtos::responses::{DaySlotsResponse, SlotView, StatisticsResponse};
use crate::api::handlers::entry::entry_views;
use crate::domain::services::{slots::{evaluate_slot, time_slots}, statistics::Statistics};
use crate::error::AppError;
use chrono::NaiveDate;
use std::sync::Arc;

pub async fn day_slots(
    State(state): State<Arc<AppState>>,
    Path(date): Path<NaiveDate>,
) -> Result<impl IntoResponse, AppError> {
    let config = state.entry_service.config();
    let now = state.entry_service.now();

    let slots = time_slots(config)
        .into_iter()
        .map(|slot| {
            let flags = evaluate_slot(date, slot.start, slot.end, now, config);
            SlotView { slot, flags }
        })
        .collect();

    Ok(Json(DaySlotsResponse { date, slots }))
}

pub async fn reminders(
    State(state): State<Arc<AppState>>,
    ActingEditor(editor): ActingEditor,
) -> Result<impl IntoResponse, AppError> {
    let entries = state.entry_service.reminders(&editor).await?;
    Ok(Json(entry_views(&state, entries).await?))
}

pub async fn statistics(
    State(state): State<Arc<AppState>>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    if range.from > range.to {
        return Err(AppError::Validation("'from' must not be after 'to'".into()));
    }

    let entries = state.entry_repo.list_by_range(range.from, range.to).await?;
    Ok(Json(StatisticsResponse {
        from: range.from,
        to: range.to,
        statistics: Statistics::collect(&entries),
    }))
}
