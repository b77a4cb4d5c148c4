use crate::domain::{models::patient::Patient, ports::PatientRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPatientRepo {
    pool: PgPool,
}

impl PostgresPatientRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl PatientRepository for PostgresPatientRepo {
    async fn create(&self, patient: &Patient) -> Result<Patient, AppError> {
        sqlx::query_as::<_, Patient>(
            "INSERT INTO patients (id, full_name, email, phone, date_of_birth, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(&patient.id)
            .bind(&patient.full_name)
            .bind(&patient.email)
            .bind(&patient.phone)
            .bind(patient.date_of_birth)
            .bind(patient.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, AppError> {
        sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Patient>, AppError> {
        sqlx::query_as::<_, Patient>("SELECT * FROM patients ORDER BY full_name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
