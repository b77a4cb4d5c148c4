pub mod postgres_appointment_repo;
pub mod postgres_auth_repo;
pub mod postgres_availability_repo;
pub mod postgres_holiday_repo;
pub mod postgres_job_repo;
pub mod postgres_patient_repo;
pub mod postgres_professional_repo;
pub mod postgres_service_repo;
pub mod postgres_slot_repo;
pub mod postgres_user_repo;
pub mod sqlite_appointment_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_availability_repo;
pub mod sqlite_holiday_repo;
pub mod sqlite_job_repo;
pub mod sqlite_patient_repo;
pub mod sqlite_professional_repo;
pub mod sqlite_service_repo;
pub mod sqlite_slot_repo;
pub mod sqlite_user_repo;
