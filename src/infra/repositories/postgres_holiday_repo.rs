use crate::domain::{models::holiday::ClinicHoliday, ports::HolidayRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresHolidayRepo {
    pool: PgPool,
}

impl PostgresHolidayRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl HolidayRepository for PostgresHolidayRepo {
    async fn create(&self, holiday: &ClinicHoliday) -> Result<ClinicHoliday, AppError> {
        sqlx::query_as::<_, ClinicHoliday>(
            "INSERT INTO clinic_holidays (id, date, name, created_at) VALUES ($1, $2, $3, $4) RETURNING *"
        )
            .bind(&holiday.id)
            .bind(holiday.date)
            .bind(&holiday.name)
            .bind(holiday.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ClinicHoliday>, AppError> {
        sqlx::query_as::<_, ClinicHoliday>(
            "SELECT * FROM clinic_holidays WHERE date >= $1 AND date <= $2 ORDER BY date ASC"
        )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_by_date(&self, date: NaiveDate) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM clinic_holidays WHERE date = $1")
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Holiday not found".into()));
        }
        Ok(())
    }
}
