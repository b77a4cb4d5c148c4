use chrono::{DateTime, Duration, Utc};

use crate::domain::models::time_slot::TimeSlot;
use crate::domain::services::availability::OpenWindow;

/// A slot candidate before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCandidate {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// Tiles a window into back-to-back fixed-duration candidates starting at the
/// window's start. A final partial tile is dropped, not truncated. The buffer
/// is deliberately NOT inserted here: generation stays idempotent and
/// independent of booking order; the gap policy is enforced at read time by
/// `filter_bookable` against booked commitments.
pub fn tile_window(window: &OpenWindow, duration_min: i64) -> Vec<SlotCandidate> {
    if duration_min <= 0 {
        return Vec::new();
    }

    let duration = Duration::minutes(duration_min);
    let mut candidates = Vec::new();
    let mut cursor = window.start_at;

    while cursor + duration <= window.end_at {
        candidates.push(SlotCandidate {
            start_at: cursor,
            end_at: cursor + duration,
        });
        cursor += duration;
    }

    candidates
}

/// Whether a candidate leaves too little turnaround time around a booked
/// commitment.
///
/// With a positive buffer the gap on either side must strictly exceed the
/// buffer: a candidate ending exactly `buffer` minutes before a booked start
/// conflicts, one ending `buffer + 1` minutes before does not. With buffer 0
/// this degenerates to plain interval overlap, so back-to-back tiles never
/// conflict with their neighbours.
pub fn conflicts_with_buffer(
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    booked_start: DateTime<Utc>,
    booked_end: DateTime<Utc>,
    buffer_min: i64,
) -> bool {
    if buffer_min <= 0 {
        return candidate_start < booked_end && candidate_end > booked_start;
    }

    let pad = Duration::minutes(buffer_min);
    candidate_start <= booked_end + pad && candidate_end + pad >= booked_start
}

/// Read-path filter: drops AVAILABLE slots that violate the gap policy
/// against any booked commitment. Runs even when the booked set is disjoint
/// by construction, as a safety net against stale data.
pub fn filter_bookable(slots: Vec<TimeSlot>, booked: &[TimeSlot], buffer_min: i64) -> Vec<TimeSlot> {
    slots
        .into_iter()
        .filter(|slot| {
            !booked.iter().any(|b| {
                conflicts_with_buffer(slot.start_at, slot.end_at, b.start_at, b.end_at, buffer_min)
            })
        })
        .collect()
}
