use crate::domain::{models::professional::Professional, ports::ProfessionalRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresProfessionalRepo {
    pool: PgPool,
}

impl PostgresProfessionalRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ProfessionalRepository for PostgresProfessionalRepo {
    async fn create(&self, professional: &Professional) -> Result<Professional, AppError> {
        sqlx::query_as::<_, Professional>(
            "INSERT INTO professionals (id, full_name, specialty, active, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(&professional.id)
            .bind(&professional.full_name)
            .bind(&professional.specialty)
            .bind(professional.active)
            .bind(professional.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Professional>, AppError> {
        sqlx::query_as::<_, Professional>("SELECT * FROM professionals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Professional>, AppError> {
        sqlx::query_as::<_, Professional>("SELECT * FROM professionals ORDER BY full_name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, professional: &Professional) -> Result<Professional, AppError> {
        sqlx::query_as::<_, Professional>(
            "UPDATE professionals SET full_name = $1, specialty = $2, active = $3 WHERE id = $4 RETURNING *"
        )
            .bind(&professional.full_name)
            .bind(&professional.specialty)
            .bind(professional.active)
            .bind(&professional.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
