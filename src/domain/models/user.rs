use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::models::customer::Customer;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String, is_staff: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            is_staff,
            created_at: Utc::now(),
        }
    }
}

/// Whoever is creating or changing an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub id: String,
    pub username: String,
    pub is_staff: bool,
    /// Set when a customer is acting on their own behalf.
    pub customer_id: Option<String>,
}

impl From<&User> for Editor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            is_staff: user.is_staff,
            customer_id: None,
        }
    }
}

impl From<&Customer> for Editor {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            username: customer.username.clone(),
            is_staff: false,
            customer_id: Some(customer.id.clone()),
        }
    }
}
