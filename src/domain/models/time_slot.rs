use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const SLOT_AVAILABLE: &str = "AVAILABLE";
pub const SLOT_BOOKED: &str = "BOOKED";
pub const SLOT_BREAK: &str = "BREAK";

/// The atomic bookable unit. (professional_id, start_at, end_at) is unique,
/// so regenerating slots over an already-materialized window is a no-op.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct TimeSlot {
    pub id: String,
    pub professional_id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(professional_id: String, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            professional_id,
            start_at,
            end_at,
            status: SLOT_AVAILABLE.to_string(),
            created_at: Utc::now(),
        }
    }
}
