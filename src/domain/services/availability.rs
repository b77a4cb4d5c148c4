use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use std::collections::{HashMap, HashSet};

use crate::domain::models::availability::{AvailabilityException, AvailabilityRule};
use crate::domain::models::holiday::ClinicHoliday;
use crate::domain::models::time_slot::{TimeSlot, SLOT_AVAILABLE};
use crate::domain::services::recurrence::Recurrence;
use crate::domain::services::zoned;

/// One concrete block of open time produced by expanding a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenWindow {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub rule_id: String,
}

/// Expands a professional's active rules into concrete open windows over
/// [range_start, range_end).
///
/// Precedence on a fired date: a clinic holiday blocks it outright; otherwise
/// the newest exception for the date either blocks it (`is_unavailable`) or
/// substitutes the window times wholesale. Windows that are not fully inside
/// the range are dropped whole, not clipped, and windows overlapping a busy
/// (booked or break) slot are dropped. Overlapping windows from distinct
/// rules survive independently; slot booking stays exclusive per slot.
pub fn expand_open_windows(
    rules: &[AvailabilityRule],
    exceptions: &[AvailabilityException],
    holidays: &[ClinicHoliday],
    busy: &[TimeSlot],
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Vec<OpenWindow> {
    let holiday_dates: HashSet<NaiveDate> = holidays.iter().map(|h| h.date).collect();

    // Newest exception wins per date.
    let mut exception_by_date: HashMap<NaiveDate, &AvailabilityException> = HashMap::new();
    for exception in exceptions {
        let keep = match exception_by_date.get(&exception.date) {
            Some(existing) => exception.created_at > existing.created_at,
            None => true,
        };
        if keep {
            exception_by_date.insert(exception.date, exception);
        }
    }

    let blocking: Vec<&TimeSlot> = busy.iter().filter(|s| s.status != SLOT_AVAILABLE).collect();

    let mut windows = Vec::new();

    for rule in rules.iter().filter(|r| r.active) {
        // Rules are validated at creation time; anything unparsable here is
        // stale data and contributes no windows.
        let Ok(tz) = rule.timezone.parse::<Tz>() else { continue };
        let Ok(recurrence) = Recurrence::parse(&rule.recurrence) else { continue };
        let Ok(rule_start) = NaiveTime::parse_from_str(&rule.start_time, "%H:%M") else { continue };
        let Ok(rule_end) = NaiveTime::parse_from_str(&rule.end_time, "%H:%M") else { continue };

        let first_date = zoned::local_date(range_start, tz);
        let last_date = zoned::local_date(range_end, tz);

        for date in recurrence.dates_between(first_date, last_date) {
            if holiday_dates.contains(&date) {
                continue;
            }

            let mut start_tod = rule_start;
            let mut end_tod = rule_end;

            if let Some(exception) = exception_by_date.get(&date) {
                if exception.is_unavailable {
                    continue;
                }
                if let (Some(alt_start), Some(alt_end)) =
                    (exception.alt_start_time.as_deref(), exception.alt_end_time.as_deref())
                {
                    let Ok(parsed_start) = NaiveTime::parse_from_str(alt_start, "%H:%M") else { continue };
                    let Ok(parsed_end) = NaiveTime::parse_from_str(alt_end, "%H:%M") else { continue };
                    start_tod = parsed_start;
                    end_tod = parsed_end;
                }
            }

            let start_at = zoned::at_time(date, start_tod, tz);
            let end_at = zoned::at_time(date, end_tod, tz);

            if start_at >= end_at {
                continue;
            }
            // No clipping: a window straddling the range boundary is dropped.
            if start_at < range_start || end_at > range_end {
                continue;
            }
            if blocking.iter().any(|s| s.start_at < end_at && s.end_at > start_at) {
                continue;
            }

            windows.push(OpenWindow {
                start_at,
                end_at,
                rule_id: rule.id.clone(),
            });
        }
    }

    windows.sort_by(|a, b| a.start_at.cmp(&b.start_at).then_with(|| a.rule_id.cmp(&b.rule_id)));
    windows
}
