use crate::domain::models::{appointment::Appointment, professional::Professional, time_slot::TimeSlot};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) string for a confirmed appointment
pub fn generate_ics(appointment: &Appointment, professional: &Professional, slot: &TimeSlot) -> String {
    let mut calendar = Calendar::new();

    let summary = format!("{} with {}", appointment.service_name, professional.full_name);

    let ical_event = IcalEvent::new()
        .summary(&summary)
        .description(&appointment.reason)
        .starts(slot.start_at)
        .ends(slot.end_at)
        .uid(&appointment.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
