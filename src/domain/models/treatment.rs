use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Treatment {
    pub id: String,
    pub name: String,
    pub min_duration_min: Option<i32>,
    pub resource_required: bool,
    pub created_at: DateTime<Utc>,
}

impl Treatment {
    pub fn new(name: String, min_duration_min: Option<i32>, resource_required: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            min_duration_min,
            resource_required,
            created_at: Utc::now(),
        }
    }

    /// The minimum duration, if one is set and non-zero.
    pub fn min_duration(&self) -> Option<Duration> {
        self.min_duration_min
            .filter(|m| *m > 0)
            .map(|m| Duration::minutes(m as i64))
    }
}
