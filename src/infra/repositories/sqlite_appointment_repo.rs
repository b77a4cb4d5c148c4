use crate::domain::{
    models::{appointment::Appointment, time_slot::TimeSlot},
    ports::AppointmentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn book(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // The store enforces the slot is still free; an earlier read is not
        // enough to close the race window.
        let reserved = sqlx::query("UPDATE time_slots SET status = 'BOOKED' WHERE id = ? AND status = 'AVAILABLE'")
            .bind(&appointment.time_slot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if reserved.rows_affected() == 0 {
            return Err(AppError::Conflict("Slot is no longer available".to_string()));
        }

        let created = sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, patient_id, professional_id, service_id, time_slot_id, service_name, service_price_cents, reason, notes, status, reminder_sent_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&appointment.id)
            .bind(&appointment.patient_id)
            .bind(&appointment.professional_id)
            .bind(&appointment.service_id)
            .bind(&appointment.time_slot_id)
            .bind(&appointment.service_name)
            .bind(appointment.service_price_cents)
            .bind(&appointment.reason)
            .bind(&appointment.notes)
            .bind(&appointment.status)
            .bind(appointment.reminder_sent_at)
            .bind(appointment.created_at)
            .bind(appointment.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn reschedule(&self, appointment: &Appointment, new_slot: &TimeSlot) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Both conditional transitions must succeed or neither sticks: the
        // old slot must not end up AVAILABLE if the new reservation fails.
        let released = sqlx::query("UPDATE time_slots SET status = 'AVAILABLE' WHERE id = ? AND status = 'BOOKED'")
            .bind(&appointment.time_slot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if released.rows_affected() == 0 {
            return Err(AppError::Conflict("Appointment slot changed concurrently".to_string()));
        }

        let reserved = sqlx::query("UPDATE time_slots SET status = 'BOOKED' WHERE id = ? AND status = 'AVAILABLE'")
            .bind(&new_slot.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if reserved.rows_affected() == 0 {
            return Err(AppError::Conflict("Target slot is no longer available".to_string()));
        }

        let updated = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET time_slot_id = ?, professional_id = ?, updated_at = ? WHERE id = ? AND time_slot_id = ? RETURNING *"
        )
            .bind(&new_slot.id)
            .bind(&new_slot.professional_id)
            .bind(Utc::now())
            .bind(&appointment.id)
            .bind(&appointment.time_slot_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::Conflict("Appointment changed concurrently".to_string()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn cancel(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'CANCELLED', updated_at = ? WHERE id = ? AND status IN ('PENDING', 'CONFIRMED') RETURNING *"
        )
            .bind(Utc::now())
            .bind(&appointment.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::Conflict("Appointment is already closed".to_string()))?;

        // The row is kept for history; only the slot goes back into the pool.
        sqlx::query("UPDATE time_slots SET status = 'AVAILABLE' WHERE id = ? AND status = 'BOOKED'")
            .bind(&appointment.time_slot_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }

    async fn transition_status(&self, id: &str, from: &str, to: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = ?, updated_at = ? WHERE id = ? AND status = ? RETURNING *"
        )
            .bind(to)
            .bind(Utc::now())
            .bind(id)
            .bind(from)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_patient(&self, patient_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE patient_id = ? ORDER BY created_at DESC")
            .bind(patient_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_professional(&self, professional_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE professional_id = ? ORDER BY created_at DESC")
            .bind(professional_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_reminder_sent(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE appointments SET reminder_sent_at = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
