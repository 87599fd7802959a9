use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use crate::domain::models::resource::Resource;
use crate::domain::services::interval::TimeInterval;
use crate::error::AppError;

pub const DEFAULT_DURATION_MIN: i32 = 60;
const MINUTES_PER_DAY: i32 = 24 * 60;
const MAX_NOTES_LEN: usize = 2000;

/// A diary entry: one appointment in the calendar.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Entry {
    pub id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_min: i32,
    pub notes: String,
    pub creator_id: Option<String>,
    pub editor_id: Option<String>,
    pub customer_id: Option<String>,
    pub treatment_id: Option<String>,
    pub resource_id: Option<String>,
    pub cancelled: bool,
    pub no_show: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewEntryParams {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_min: Option<i32>,
    pub notes: Option<String>,
    pub customer_id: Option<String>,
    pub treatment_id: Option<String>,
    pub resource_id: Option<String>,
}

/// The dimension a clash is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictScope<'a> {
    Resource(&'a str),
    Customer(&'a str),
}

impl Entry {
    pub fn new(params: NewEntryParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: params.date,
            time: params.time,
            duration_min: params.duration_min.unwrap_or(DEFAULT_DURATION_MIN),
            notes: params.notes.unwrap_or_default(),
            creator_id: None,
            editor_id: None,
            customer_id: params.customer_id,
            treatment_id: params.treatment_id,
            resource_id: params.resource_id,
            cancelled: false,
            no_show: false,
            created_at: Utc::now(),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_min as i64)
    }

    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.date, self.time, self.duration())
    }

    /// Active entries take part in clash detection.
    pub fn is_active(&self) -> bool {
        !self.cancelled && !self.no_show
    }

    /// Short label for calendar cells: the resource if there is one, else the notes.
    pub fn short(&self, resource: Option<&Resource>) -> String {
        match resource {
            Some(r) => r.name.clone(),
            None => self.notes.clone(),
        }
    }

    /// Plain field checks run after the booking rules.
    pub fn validate_fields(&self) -> Result<(), AppError> {
        if self.duration_min < 0 {
            return Err(AppError::Validation("Duration cannot be negative".into()));
        }
        if self.duration_min >= MINUTES_PER_DAY {
            return Err(AppError::Validation("Duration must be shorter than a day".into()));
        }
        if self.notes.len() > MAX_NOTES_LEN {
            return Err(AppError::Validation(format!("Notes must be at most {} characters", MAX_NOTES_LEN)));
        }
        if self.cancelled && self.no_show {
            return Err(AppError::Validation("An entry cannot be both cancelled and a no-show".into()));
        }
        Ok(())
    }
}
