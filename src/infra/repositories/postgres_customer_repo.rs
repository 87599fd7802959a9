use crate::domain::{models::customer::Customer, ports::CustomerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCustomerRepo {
    pool: PgPool,
}

impl PostgresCustomerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepo {
    async fn create(&self, customer: &Customer) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"INSERT INTO customers (id, username, first_name, last_name, email, phone, date_of_birth, title, gender, notes, password_hash, reminder_opt_out, change_notification_opt_out, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
               RETURNING *"#,
        )
            .bind(&customer.id)
            .bind(&customer.username)
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.email)
            .bind(&customer.phone)
            .bind(customer.date_of_birth)
            .bind(&customer.title)
            .bind(&customer.gender)
            .bind(&customer.notes)
            .bind(&customer.password_hash)
            .bind(customer.reminder_opt_out)
            .bind(customer.change_notification_opt_out)
            .bind(customer.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, customer: &Customer) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"UPDATE customers SET first_name=$1, last_name=$2, email=$3, phone=$4, date_of_birth=$5, title=$6, gender=$7, notes=$8, reminder_opt_out=$9, change_notification_opt_out=$10
               WHERE id=$11
               RETURNING *"#,
        )
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.email)
            .bind(&customer.phone)
            .bind(customer.date_of_birth)
            .bind(&customer.title)
            .bind(&customer.gender)
            .bind(&customer.notes)
            .bind(customer.reminder_opt_out)
            .bind(customer.change_notification_opt_out)
            .bind(&customer.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Customer not found".into()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Customer>, AppError> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY last_name ASC, first_name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
