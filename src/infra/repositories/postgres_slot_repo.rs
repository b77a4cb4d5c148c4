use crate::domain::{models::time_slot::TimeSlot, ports::TimeSlotRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresTimeSlotRepo {
    pool: PgPool,
}

impl PostgresTimeSlotRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl TimeSlotRepository for PostgresTimeSlotRepo {
    async fn insert_ignoring_duplicates(&self, slots: &[TimeSlot]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut inserted = 0u64;
        for slot in slots {
            let result = sqlx::query(
                "INSERT INTO time_slots (id, professional_id, start_at, end_at, status, created_at) VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (professional_id, start_at, end_at) DO NOTHING"
            )
                .bind(&slot.id)
                .bind(&slot.professional_id)
                .bind(slot.start_at)
                .bind(slot.end_at)
                .bind(&slot.status)
                .bind(slot.created_at)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            inserted += result.rows_affected();
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(inserted)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<TimeSlot>, AppError> {
        sqlx::query_as::<_, TimeSlot>("SELECT * FROM time_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, professional_id: &str, status: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<TimeSlot>, AppError> {
        sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE professional_id = $1 AND status = $2 AND start_at >= $3 AND start_at < $4 ORDER BY start_at ASC"
        )
            .bind(professional_id)
            .bind(status)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_blocking(&self, professional_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<TimeSlot>, AppError> {
        sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE professional_id = $1 AND status != 'AVAILABLE' AND start_at < $2 AND end_at > $3 ORDER BY start_at ASC"
        )
            .bind(professional_id)
            .bind(end)
            .bind(start)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_available_near(&self, professional_id: &str, around: DateTime<Utc>, limit: i64) -> Result<Vec<TimeSlot>, AppError> {
        sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE professional_id = $1 AND status = 'AVAILABLE' ORDER BY ABS(EXTRACT(EPOCH FROM (start_at - $2))) ASC LIMIT $3"
        )
            .bind(professional_id)
            .bind(around)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn transition_status(&self, id: &str, from: &str, to: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE time_slots SET status = $1 WHERE id = $2 AND status = $3")
            .bind(to)
            .bind(id)
            .bind(from)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
