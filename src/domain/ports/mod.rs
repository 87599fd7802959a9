use crate::domain::models::{
    customer::Customer, entry::{ConflictScope, Entry}, resource::Resource,
    treatment::Treatment, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn create(&self, entry: &Entry) -> Result<Entry, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Entry>, AppError>;
    async fn update(&self, entry: &Entry) -> Result<Entry, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;

    /// Active entries on `date` sharing the scope's resource or customer, other than
    /// `excluding_id`.
    async fn find_active_in_scope(
        &self,
        date: NaiveDate,
        scope: ConflictScope<'_>,
        excluding_id: Option<&str>,
    ) -> Result<Vec<Entry>, AppError>;

    /// The earliest active entry on `date` starting at or after `from`.
    async fn find_next_active(
        &self,
        date: NaiveDate,
        from: NaiveTime,
        excluding_id: Option<&str>,
    ) -> Result<Option<Entry>, AppError>;

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Entry>, AppError>;
    async fn list_by_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Entry>, AppError>;
    /// A customer's entries dated on or before `until`.
    async fn list_by_customer_until(&self, customer_id: &str, until: NaiveDate) -> Result<Vec<Entry>, AppError>;

    /// Entries on `today` starting at or after `now`, plus every entry on `tomorrow`.
    /// With a customer, only that customer's non-cancelled entries.
    async fn list_upcoming(
        &self,
        today: NaiveDate,
        now: NaiveTime,
        tomorrow: NaiveDate,
        customer_id: Option<&str>,
    ) -> Result<Vec<Entry>, AppError>;

    async fn delete_before(&self, date: NaiveDate) -> Result<u64, AppError>;
}

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn create(&self, resource: &Resource) -> Result<Resource, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Resource>, AppError>;
    async fn list(&self) -> Result<Vec<Resource>, AppError>;
}

#[async_trait]
pub trait TreatmentRepository: Send + Sync {
    async fn create(&self, treatment: &Treatment) -> Result<Treatment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Treatment>, AppError>;
    async fn list(&self) -> Result<Vec<Treatment>, AppError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, customer: &Customer) -> Result<Customer, AppError>;
    async fn update(&self, customer: &Customer) -> Result<Customer, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, AppError>;
    async fn list(&self) -> Result<Vec<Customer>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
}
