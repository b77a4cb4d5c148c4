pub mod appointment;
pub mod auth;
pub mod availability;
pub mod holiday;
pub mod job;
pub mod patient;
pub mod professional;
pub mod service;
pub mod time_slot;
pub mod user;
