use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: String,
    pub professional_id: Option<String>,
    pub patient_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CreatePatientRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct CreateProfessionalRequest {
    pub full_name: String,
    pub specialty: String,
}

#[derive(Deserialize)]
pub struct UpdateProfessionalRequest {
    pub full_name: Option<String>,
    pub specialty: Option<String>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
}

#[derive(Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateRuleRequest {
    pub recurrence: String,
    pub start_time: String,
    pub end_time: String,
    pub timezone: Option<String>,
    pub slot_duration_min: i32,
}

#[derive(Deserialize)]
pub struct UpdateRuleRequest {
    pub recurrence: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub timezone: Option<String>,
    pub slot_duration_min: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateExceptionRequest {
    pub date: NaiveDate,
    pub is_unavailable: bool,
    pub alt_start_time: Option<String>,
    pub alt_end_time: Option<String>,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateHolidayRequest {
    pub date: NaiveDate,
    pub name: String,
}

#[derive(Deserialize)]
pub struct GenerateSlotsRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Deserialize)]
pub struct BookAppointmentRequest {
    pub time_slot_id: String,
    pub service_id: String,
    pub patient_id: String,
    pub professional_id: Option<String>,
    pub reason: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub new_time_slot_id: String,
}

#[derive(Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}
