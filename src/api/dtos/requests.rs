use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateEntryRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_min: Option<i32>,
    pub notes: Option<String>,
    pub customer_id: Option<String>,
    pub treatment_id: Option<String>,
    pub resource_id: Option<String>,
}

/// Full edit: omitted references and flags are cleared.
#[derive(Deserialize)]
pub struct UpdateEntryRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_min: i32,
    #[serde(default)]
    pub notes: String,
    pub customer_id: Option<String>,
    pub treatment_id: Option<String>,
    pub resource_id: Option<String>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub no_show: bool,
}

#[derive(Deserialize)]
pub struct MoveEntryRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Deserialize)]
pub struct DayQuery {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Deserialize)]
pub struct CreateResourceRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTreatmentRequest {
    pub name: String,
    pub min_duration_min: Option<i32>,
    #[serde(default)]
    pub resource_required: bool,
}

#[derive(Deserialize)]
pub struct CreateCustomerRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub title: Option<String>,
    pub gender: Option<String>,
    pub notes: Option<String>,
}

/// Full edit of a customer's personal details: omitted optional fields are cleared,
/// an omitted gender is kept.
#[derive(Deserialize)]
pub struct UpdateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub title: Option<String>,
    pub gender: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub reminder_opt_out: bool,
    #[serde(default)]
    pub change_notification_opt_out: bool,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_staff: bool,
}
