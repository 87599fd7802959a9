use crate::domain::{models::entry::{ConflictScope, Entry}, ports::EntryRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{NaiveDate, NaiveTime};

pub struct PostgresEntryRepo {
    pool: PgPool,
}

impl PostgresEntryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for PostgresEntryRepo {
    async fn create(&self, entry: &Entry) -> Result<Entry, AppError> {
        sqlx::query_as::<_, Entry>(
            r#"INSERT INTO entries (id, date, time, duration_min, notes, creator_id, editor_id, customer_id, treatment_id, resource_id, cancelled, no_show, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
               RETURNING *"#
        )
            .bind(&entry.id)
            .bind(entry.date)
            .bind(entry.time)
            .bind(entry.duration_min)
            .bind(&entry.notes)
            .bind(&entry.creator_id)
            .bind(&entry.editor_id)
            .bind(&entry.customer_id)
            .bind(&entry.treatment_id)
            .bind(&entry.resource_id)
            .bind(entry.cancelled)
            .bind(entry.no_show)
            .bind(entry.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Entry>, AppError> {
        sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, entry: &Entry) -> Result<Entry, AppError> {
        sqlx::query_as::<_, Entry>(
            r#"UPDATE entries SET date=$1, time=$2, duration_min=$3, notes=$4, editor_id=$5, customer_id=$6, treatment_id=$7, resource_id=$8, cancelled=$9, no_show=$10
               WHERE id=$11
               RETURNING *"#
        )
            .bind(entry.date)
            .bind(entry.time)
            .bind(entry.duration_min)
            .bind(&entry.notes)
            .bind(&entry.editor_id)
            .bind(&entry.customer_id)
            .bind(&entry.treatment_id)
            .bind(&entry.resource_id)
            .bind(entry.cancelled)
            .bind(entry.no_show)
            .bind(&entry.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Entry not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Entry not found".into()));
        }
        Ok(())
    }

    async fn find_active_in_scope(
        &self,
        date: NaiveDate,
        scope: ConflictScope<'_>,
        excluding_id: Option<&str>,
    ) -> Result<Vec<Entry>, AppError> {
        let (column, value) = match scope {
            ConflictScope::Resource(id) => ("resource_id", id),
            ConflictScope::Customer(id) => ("customer_id", id),
        };
        let sql = format!(
            "SELECT * FROM entries WHERE date = $1 AND {} = $2 AND cancelled = FALSE AND no_show = FALSE AND id <> $3 ORDER BY time ASC",
            column
        );

        sqlx::query_as::<_, Entry>(&sql)
            .bind(date)
            .bind(value)
            .bind(excluding_id.unwrap_or_default())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_next_active(
        &self,
        date: NaiveDate,
        from: NaiveTime,
        excluding_id: Option<&str>,
    ) -> Result<Option<Entry>, AppError> {
        sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE date = $1 AND time >= $2 AND cancelled = FALSE AND no_show = FALSE AND id <> $3 ORDER BY time ASC LIMIT 1"
        )
            .bind(date)
            .bind(from)
            .bind(excluding_id.unwrap_or_default())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Entry>, AppError> {
        sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE date = $1 ORDER BY time ASC")
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Entry>, AppError> {
        sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE date BETWEEN $1 AND $2 ORDER BY date ASC, time ASC")
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_customer_until(&self, customer_id: &str, until: NaiveDate) -> Result<Vec<Entry>, AppError> {
        sqlx::query_as::<_, Entry>("SELECT * FROM entries WHERE customer_id = $1 AND date <= $2 ORDER BY date ASC, time ASC")
            .bind(customer_id)
            .bind(until)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_upcoming(
        &self,
        today: NaiveDate,
        now: NaiveTime,
        tomorrow: NaiveDate,
        customer_id: Option<&str>,
    ) -> Result<Vec<Entry>, AppError> {
        sqlx::query_as::<_, Entry>(
            r#"SELECT * FROM entries
               WHERE ((date = $1 AND time >= $2) OR date = $3)
                 AND ($4::TEXT IS NULL OR (customer_id = $4 AND cancelled = FALSE))
               ORDER BY date ASC, time ASC"#
        )
            .bind(today)
            .bind(now)
            .bind(tomorrow)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_before(&self, date: NaiveDate) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM entries WHERE date < $1")
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
