use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const APPT_PENDING: &str = "PENDING";
pub const APPT_CONFIRMED: &str = "CONFIRMED";
pub const APPT_CANCELLED: &str = "CANCELLED";
pub const APPT_COMPLETED: &str = "COMPLETED";

/// One patient visit, bound 1:1 to a TimeSlot. The slot reference is
/// repointed on reschedule, never duplicated; cancellation keeps the row for
/// history and releases the slot.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub professional_id: String,
    pub service_id: String,
    pub time_slot_id: String,
    pub service_name: String,
    pub service_price_cents: i64,
    pub reason: String,
    pub notes: Option<String>,
    pub status: String,
    pub reminder_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub patient_id: String,
    pub professional_id: String,
    pub service_id: String,
    pub time_slot_id: String,
    pub service_name: String,
    pub service_price_cents: i64,
    pub reason: String,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            patient_id: params.patient_id,
            professional_id: params.professional_id,
            service_id: params.service_id,
            time_slot_id: params.time_slot_id,
            service_name: params.service_name,
            service_price_cents: params.service_price_cents,
            reason: params.reason,
            notes: params.notes,
            status: APPT_PENDING.to_string(),
            reminder_sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Statuses that still own their slot.
    pub fn is_open(&self) -> bool {
        self.status == APPT_PENDING || self.status == APPT_CONFIRMED
    }
}
