use crate::domain::models::{
    appointment::Appointment, auth::RefreshTokenRecord,
    availability::{AvailabilityException, AvailabilityRule},
    holiday::ClinicHoliday, job::Job, patient::Patient, professional::Professional,
    service::Service, time_slot::TimeSlot, user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn create(&self, patient: &Patient) -> Result<Patient, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, AppError>;
    async fn list(&self) -> Result<Vec<Patient>, AppError>;
}

#[async_trait]
pub trait ProfessionalRepository: Send + Sync {
    async fn create(&self, professional: &Professional) -> Result<Professional, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Professional>, AppError>;
    async fn list(&self) -> Result<Vec<Professional>, AppError>;
    async fn update(&self, professional: &Professional) -> Result<Professional, AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError>;
    async fn list(&self) -> Result<Vec<Service>, AppError>;
    async fn update(&self, service: &Service) -> Result<Service, AppError>;
}

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn create_rule(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError>;
    async fn find_rule(&self, id: &str) -> Result<Option<AvailabilityRule>, AppError>;
    async fn list_rules(&self, professional_id: &str) -> Result<Vec<AvailabilityRule>, AppError>;
    async fn update_rule(&self, rule: &AvailabilityRule) -> Result<AvailabilityRule, AppError>;

    async fn create_exception(&self, exception: &AvailabilityException) -> Result<AvailabilityException, AppError>;
    async fn list_exceptions_by_range(&self, professional_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<AvailabilityException>, AppError>;
    async fn delete_exception(&self, professional_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait HolidayRepository: Send + Sync {
    async fn create(&self, holiday: &ClinicHoliday) -> Result<ClinicHoliday, AppError>;
    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ClinicHoliday>, AppError>;
    async fn delete_by_date(&self, date: NaiveDate) -> Result<(), AppError>;
}

#[async_trait]
pub trait TimeSlotRepository: Send + Sync {
    /// Bulk materialization. Candidates colliding with the
    /// (professional, start, end) unique key are skipped; returns the number
    /// of rows actually inserted.
    async fn insert_ignoring_duplicates(&self, slots: &[TimeSlot]) -> Result<u64, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<TimeSlot>, AppError>;
    async fn list_by_status(&self, professional_id: &str, status: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<TimeSlot>, AppError>;
    /// Booked or break slots overlapping the range.
    async fn list_blocking(&self, professional_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<TimeSlot>, AppError>;
    /// Available slots ordered by distance from an instant, for suggesting
    /// alternatives after a lost race.
    async fn list_available_near(&self, professional_id: &str, around: DateTime<Utc>, limit: i64) -> Result<Vec<TimeSlot>, AppError>;
    /// Compare-and-set status transition; false when the slot was not in the
    /// expected state.
    async fn transition_status(&self, id: &str, from: &str, to: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Booking transaction: conditionally reserves the slot
    /// (AVAILABLE -> BOOKED, enforced by the store) and inserts the
    /// appointment; any failure rolls back both.
    async fn book(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    /// Reschedule transaction: release old slot, reserve new slot, repoint
    /// the appointment — all conditional, all-or-nothing.
    async fn reschedule(&self, appointment: &Appointment, new_slot: &TimeSlot) -> Result<Appointment, AppError>;
    /// Cancellation transaction: retire the appointment row and release its
    /// slot back to AVAILABLE.
    async fn cancel(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    /// Conditional status move (confirm/complete); None when the appointment
    /// was not in the expected state.
    async fn transition_status(&self, id: &str, from: &str, to: &str) -> Result<Option<Appointment>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_by_patient(&self, patient_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_by_professional(&self, professional_id: &str) -> Result<Vec<Appointment>, AppError>;
    async fn list_all(&self) -> Result<Vec<Appointment>, AppError>;
    async fn mark_reminder_sent(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<Job, AppError>;
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
    async fn cancel_jobs_for_appointment(&self, appointment_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str, attachment_name: Option<&str>, attachment_data: Option<&[u8]>) -> Result<(), AppError>;
}
