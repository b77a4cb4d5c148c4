use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::time_slot::TimeSlot;

#[derive(Serialize)]
pub struct SlotView {
    pub id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl From<&TimeSlot> for SlotView {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            id: slot.id.clone(),
            start_at: slot.start_at,
            end_at: slot.end_at,
        }
    }
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: String,
    pub slots: Vec<SlotView>,
}

#[derive(Serialize)]
pub struct GenerateSlotsResponse {
    pub created: u64,
}
