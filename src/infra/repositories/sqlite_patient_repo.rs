use crate::domain::{models::patient::Patient, ports::PatientRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePatientRepo {
    pool: SqlitePool,
}

impl SqlitePatientRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl PatientRepository for SqlitePatientRepo {
    async fn create(&self, patient: &Patient) -> Result<Patient, AppError> {
        sqlx::query_as::<_, Patient>(
            "INSERT INTO patients (id, full_name, email, phone, date_of_birth, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
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
        sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = ?")
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
