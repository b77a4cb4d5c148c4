pub mod auth_service;
pub mod availability;
pub mod calendar;
pub mod recurrence;
pub mod slots;
pub mod zoned;
