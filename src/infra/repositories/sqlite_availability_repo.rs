use crate::domain::{
    models::availability::{AvailabilityException, AvailabilityRule},
    ports::AvailabilityRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteAvailabilityRepo {
    pool: SqlitePool,
}

impl SqliteAvailabilityRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl AvailabilityRepository for SqliteAvailabilityRepo {
    async fn create_rule(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError> {
        sqlx::query_as::<_, AvailabilityRule>(
            "INSERT INTO availability_rules (id, professional_id, recurrence, start_time, end_time, timezone, slot_duration_min, active, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&rule.id)
            .bind(&rule.professional_id)
            .bind(&rule.recurrence)
            .bind(&rule.start_time)
            .bind(&rule.end_time)
            .bind(&rule.timezone)
            .bind(rule.slot_duration_min)
            .bind(rule.active)
            .bind(rule.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_rule(&self, id: &str) -> Result<Option<AvailabilityRule>, AppError> {
        sqlx::query_as::<_, AvailabilityRule>("SELECT * FROM availability_rules WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_rules(&self, professional_id: &str) -> Result<Vec<AvailabilityRule>, AppError> {
        sqlx::query_as::<_, AvailabilityRule>(
            "SELECT * FROM availability_rules WHERE professional_id = ? ORDER BY created_at ASC"
        )
            .bind(professional_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_rule(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError> {
        sqlx::query_as::<_, AvailabilityRule>(
            "UPDATE availability_rules SET recurrence = ?, start_time = ?, end_time = ?, timezone = ?, slot_duration_min = ?, active = ? WHERE id = ? RETURNING *"
        )
            .bind(&rule.recurrence)
            .bind(&rule.start_time)
            .bind(&rule.end_time)
            .bind(&rule.timezone)
            .bind(rule.slot_duration_min)
            .bind(rule.active)
            .bind(&rule.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create_exception(&self, exception: &AvailabilityException) -> Result<AvailabilityException, AppError> {
        sqlx::query_as::<_, AvailabilityException>(
            "INSERT INTO availability_exceptions (id, professional_id, date, is_unavailable, alt_start_time, alt_end_time, reason, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&exception.id)
            .bind(&exception.professional_id)
            .bind(exception.date)
            .bind(exception.is_unavailable)
            .bind(&exception.alt_start_time)
            .bind(&exception.alt_end_time)
            .bind(&exception.reason)
            .bind(exception.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_exceptions_by_range(&self, professional_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<AvailabilityException>, AppError> {
        sqlx::query_as::<_, AvailabilityException>(
            "SELECT * FROM availability_exceptions WHERE professional_id = ? AND date >= ? AND date <= ? ORDER BY created_at ASC"
        )
            .bind(professional_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_exception(&self, professional_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM availability_exceptions WHERE professional_id = ? AND id = ?")
            .bind(professional_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Exception not found".into()));
        }
        Ok(())
    }
}
