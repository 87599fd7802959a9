use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Business-rule failures raised while validating an entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Resource requirement is not met.")]
    MissingResource,
    #[error("Duration must be at least the minimum treatment time.")]
    InsufficientDuration,
    #[error("Resource clash with another entry. Please change resource or time.")]
    ResourceConflict,
    #[error("Double booking is not allowed. Please choose another time.")]
    DoubleBooking,
    #[error("The store is closed at that time.")]
    OutOfHours,
    #[error("Entries must be booked in the future.")]
    PastBooking,
    #[error("Entries must be booked at least {0} days in advance.")]
    AdvanceBooking(i64),
    #[error("An entry must finish on the day it starts.")]
    CrossesMidnight,
}

impl BookingError {
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::MissingResource => "missing_resource",
            BookingError::InsufficientDuration => "insufficient_duration",
            BookingError::ResourceConflict => "resource_conflict",
            BookingError::DoubleBooking => "double_booking",
            BookingError::OutOfHours => "out_of_hours",
            BookingError::PastBooking => "past_booking",
            BookingError::AdvanceBooking(_) => "advance_booking",
            BookingError::CrossesMidnight => "crosses_midnight",
        }
    }

    /// Entry fields the failure concerns.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            BookingError::MissingResource => &["resource"],
            BookingError::InsufficientDuration => &["duration"],
            BookingError::ResourceConflict => &["resource", "date", "time", "duration"],
            BookingError::DoubleBooking => &["customer", "date", "time", "duration"],
            BookingError::OutOfHours => &["time", "duration"],
            BookingError::PastBooking => &["date", "time"],
            BookingError::AdvanceBooking(_) => &["date"],
            BookingError::CrossesMidnight => &["time", "duration"],
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            BookingError::ResourceConflict | BookingError::DoubleBooking => StatusCode::CONFLICT,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("{0}")]
    Booking(#[from] BookingError),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Booking(e) => {
                warn!(code = e.code(), "Entry rejected: {}", e);
                return (
                    e.status(),
                    Json(json!({
                        "error": e.to_string(),
                        "code": e.code(),
                        "fields": e.fields(),
                    }))
                ).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
