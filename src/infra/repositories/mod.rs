pub mod sqlite_entry_repo;
pub mod sqlite_resource_repo;
pub mod sqlite_treatment_repo;
pub mod sqlite_customer_repo;
pub mod sqlite_user_repo;

pub mod postgres_entry_repo;
pub mod postgres_resource_repo;
pub mod postgres_treatment_repo;
pub mod postgres_customer_repo;
pub mod postgres_user_repo;
