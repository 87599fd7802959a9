use crate::domain::{models::treatment::Treatment, ports::TreatmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresTreatmentRepo {
    pool: PgPool,
}

impl PostgresTreatmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TreatmentRepository for PostgresTreatmentRepo {
    async fn create(&self, treatment: &Treatment) -> Result<Treatment, AppError> {
        sqlx::query_as::<_, Treatment>(
            "INSERT INTO treatments (id, name, min_duration_min, resource_required, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
            .bind(&treatment.id)
            .bind(&treatment.name)
            .bind(treatment.min_duration_min)
            .bind(treatment.resource_required)
            .bind(treatment.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Treatment>, AppError> {
        sqlx::query_as::<_, Treatment>("SELECT * FROM treatments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Treatment>, AppError> {
        sqlx::query_as::<_, Treatment>("SELECT * FROM treatments ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
