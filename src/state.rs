use std::sync::Arc;
use crate::domain::ports::{
    AppointmentRepository, AuthRepository, AvailabilityRepository, EmailService,
    HolidayRepository, JobRepository, PatientRepository, ProfessionalRepository,
    ServiceRepository, TimeSlotRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub patient_repo: Arc<dyn PatientRepository>,
    pub professional_repo: Arc<dyn ProfessionalRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub holiday_repo: Arc<dyn HolidayRepository>,
    pub slot_repo: Arc<dyn TimeSlotRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub auth_service: Arc<AuthService>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}
