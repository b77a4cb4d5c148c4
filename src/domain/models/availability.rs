use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// A recurring block of open time for one professional.
///
/// `recurrence` is an RRULE-subset string (see `domain::services::recurrence`),
/// `start_time`/`end_time` are wall-clock "HH:MM" strings interpreted in
/// `timezone`. Rules are never deleted; they are retired via `active = false`
/// and inactive rules are never expanded.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityRule {
    pub id: String,
    pub professional_id: String,
    pub recurrence: String,
    pub start_time: String,
    pub end_time: String,
    pub timezone: String,
    pub slot_duration_min: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewRuleParams {
    pub professional_id: String,
    pub recurrence: String,
    pub start_time: String,
    pub end_time: String,
    pub timezone: String,
    pub slot_duration_min: i32,
}

impl AvailabilityRule {
    pub fn new(params: NewRuleParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            professional_id: params.professional_id,
            recurrence: params.recurrence,
            start_time: params.start_time,
            end_time: params.end_time,
            timezone: params.timezone,
            slot_duration_min: params.slot_duration_min,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// A date-specific override of a professional's rules.
///
/// Either the whole date is blocked (`is_unavailable`) or the substitute
/// window replaces the rule's times for that date. Several rows may exist for
/// one (professional, date); the most recently created one wins.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityException {
    pub id: String,
    pub professional_id: String,
    pub date: NaiveDate,
    pub is_unavailable: bool,
    pub alt_start_time: Option<String>,
    pub alt_end_time: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityException {
    pub fn new(professional_id: String, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            professional_id,
            date,
            is_unavailable: false,
            alt_start_time: None,
            alt_end_time: None,
            reason: None,
            created_at: Utc::now(),
        }
    }
}
