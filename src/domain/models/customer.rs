use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sqlx::FromRow;
use crate::error::AppError;

pub const GENDER_MALE: &str = "M";
pub const GENDER_FEMALE: &str = "F";
const MAX_PHONE_LEN: usize = 20;

/// A customer (client, patient). Customers may also act as non-staff editors.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Customer {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub title: Option<String>,
    pub gender: String,
    pub notes: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub reminder_opt_out: bool,
    pub change_notification_opt_out: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewCustomerParams {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub title: Option<String>,
    pub gender: Option<String>,
    pub notes: Option<String>,
    pub password_hash: String,
}

impl Customer {
    pub fn new(params: NewCustomerParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: params.username,
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email.trim().to_lowercase(),
            phone: params.phone,
            date_of_birth: params.date_of_birth,
            title: params.title,
            gender: params.gender.unwrap_or_else(|| GENDER_FEMALE.to_string()),
            notes: params.notes.unwrap_or_default(),
            password_hash: params.password_hash,
            reminder_opt_out: false,
            change_notification_opt_out: false,
            created_at: Utc::now(),
        }
    }

    /// Age in whole calendar years relative to `today`; month and day are ignored.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.date_of_birth.map(|dob| today.year() - dob.year())
    }

    pub fn age(&self) -> Option<i32> {
        self.age_on(Utc::now().date_naive())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() {
            return Err(AppError::Validation("Customers must have a username".into()));
        }
        if let Some(phone) = &self.phone
            && !is_valid_phone(phone) {
            return Err(AppError::Validation("Not a valid phone number".into()));
        }
        if self.gender != GENDER_MALE && self.gender != GENDER_FEMALE {
            return Err(AppError::Validation("Gender must be M or F".into()));
        }
        Ok(())
    }
}

/// A digit followed by at least one more digit or space.
fn is_valid_phone(phone: &str) -> bool {
    let mut chars = phone.chars();
    phone.len() <= MAX_PHONE_LEN
        && chars.next().is_some_and(|c| c.is_ascii_digit())
        && phone.len() > 1
        && chars.all(|c| c.is_ascii_digit() || c == ' ')
}
