use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::GenerateSlotsRequest,
    responses::{GenerateSlotsResponse, SlotView, SlotsResponse},
};
use crate::domain::models::time_slot::{TimeSlot, SLOT_AVAILABLE, SLOT_BOOKED, SLOT_BREAK};
use crate::domain::services::{availability::expand_open_windows, slots, zoned};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use tracing::info;

fn clinic_tz(state: &AppState) -> Result<Tz, AppError> {
    state.config.clinic_timezone.parse::<Tz>()
        .map_err(|_| AppError::InternalWithMsg(format!("Invalid CLINIC_TIMEZONE: {}", state.config.clinic_timezone)))
}

/// Materializes slots for a professional over a date range. Expansion and
/// tiling are pure; the unique (professional, start, end) key makes repeated
/// generation a no-op.
pub async fn generate_slots(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(professional_id): Path<String>,
    Json(payload): Json<GenerateSlotsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !user.can_manage_professional(&professional_id) {
        return Err(AppError::Forbidden("Not allowed to manage this schedule".into()));
    }

    state.professional_repo.find_by_id(&professional_id).await?
        .ok_or(AppError::NotFound("Professional not found".into()))?;

    if payload.end_date < payload.start_date {
        return Err(AppError::Validation("end_date must not be before start_date".into()));
    }

    let tz = clinic_tz(&state)?;
    let range_start = zoned::day_bounds(payload.start_date, tz).0;
    let range_end = zoned::day_bounds(payload.end_date, tz).1;

    // Rules may live in their own zones, so fetch calendar-keyed data one day
    // wide of the requested range.
    let lookup_start = payload.start_date - Duration::days(1);
    let lookup_end = payload.end_date + Duration::days(1);

    let rules = state.availability_repo.list_rules(&professional_id).await?;
    let exceptions = state.availability_repo.list_exceptions_by_range(&professional_id, lookup_start, lookup_end).await?;
    let holidays = state.holiday_repo.list_by_range(lookup_start, lookup_end).await?;
    let busy = state.slot_repo.list_blocking(&professional_id, range_start, range_end).await?;

    let windows = expand_open_windows(&rules, &exceptions, &holidays, &busy, range_start, range_end);

    let duration_by_rule: HashMap<&str, i64> = rules.iter()
        .map(|r| (r.id.as_str(), r.slot_duration_min as i64))
        .collect();

    let mut new_slots = Vec::new();
    for window in &windows {
        let Some(&duration_min) = duration_by_rule.get(window.rule_id.as_str()) else { continue };
        for candidate in slots::tile_window(window, duration_min) {
            new_slots.push(TimeSlot::new(professional_id.clone(), candidate.start_at, candidate.end_at));
        }
    }

    let created = state.slot_repo.insert_ignoring_duplicates(&new_slots).await?;

    info!("Generated {} slots for professional {} ({} windows)", created, professional_id, windows.len());
    Ok(Json(GenerateSlotsResponse { created }))
}

/// Public read path: persisted AVAILABLE slots for one zoned day, minus any
/// that violate the buffer policy against booked commitments.
pub async fn list_slots(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    state.professional_repo.find_by_id(&professional_id).await?
        .ok_or(AppError::NotFound("Professional not found".into()))?;

    let date_str = params.get("date").ok_or(AppError::Validation("date required".into()))?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    let tz = clinic_tz(&state)?;
    let (day_start, day_end) = zoned::day_bounds(date, tz);

    let buffer_min = state.config.buffer_minutes;
    let pad = Duration::minutes(buffer_min);

    let available = state.slot_repo.list_by_status(&professional_id, SLOT_AVAILABLE, day_start, day_end).await?;
    let booked: Vec<_> = state.slot_repo
        .list_blocking(&professional_id, day_start - pad, day_end + pad)
        .await?
        .into_iter()
        .filter(|s| s.status == SLOT_BOOKED)
        .collect();

    let bookable = slots::filter_bookable(available, &booked, buffer_min);

    Ok(Json(SlotsResponse {
        date: date_str.to_string(),
        slots: bookable.iter().map(SlotView::from).collect(),
    }))
}

/// Dates in [start, end] that still have at least one bookable slot.
pub async fn available_dates(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    state.professional_repo.find_by_id(&professional_id).await?
        .ok_or(AppError::NotFound("Professional not found".into()))?;

    let start_str = params.get("start").ok_or(AppError::Validation("start required".into()))?;
    let end_str = params.get("end").ok_or(AppError::Validation("end required".into()))?;

    let start_date = NaiveDate::parse_from_str(start_str, "%Y-%m-%d").map_err(|_| AppError::Validation("Invalid start".into()))?;
    let end_date = NaiveDate::parse_from_str(end_str, "%Y-%m-%d").map_err(|_| AppError::Validation("Invalid end".into()))?;

    let tz = clinic_tz(&state)?;
    let range_start = zoned::day_bounds(start_date, tz).0;
    let range_end = zoned::day_bounds(end_date, tz).1;

    let buffer_min = state.config.buffer_minutes;
    let pad = Duration::minutes(buffer_min);

    let available = state.slot_repo.list_by_status(&professional_id, SLOT_AVAILABLE, range_start, range_end).await?;
    let booked: Vec<_> = state.slot_repo
        .list_blocking(&professional_id, range_start - pad, range_end + pad)
        .await?
        .into_iter()
        .filter(|s| s.status == SLOT_BOOKED)
        .collect();

    let bookable = slots::filter_bookable(available, &booked, buffer_min);

    let mut dates: Vec<String> = bookable.iter()
        .map(|slot| zoned::local_date(slot.start_at, tz).to_string())
        .collect();
    dates.sort();
    dates.dedup();

    Ok(Json(dates))
}

pub async fn mark_break(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(slot_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let slot = state.slot_repo.find_by_id(&slot_id).await?
        .ok_or(AppError::NotFound("Time slot not found".into()))?;

    if !user.can_manage_professional(&slot.professional_id) {
        return Err(AppError::Forbidden("Not allowed to manage this schedule".into()));
    }

    if !state.slot_repo.transition_status(&slot_id, SLOT_AVAILABLE, SLOT_BREAK).await? {
        return Err(AppError::Conflict("Slot is not available".into()));
    }

    info!("Slot {} marked as break", slot_id);
    Ok(Json(serde_json::json!({"status": "BREAK"})))
}

pub async fn release_break(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(slot_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let slot = state.slot_repo.find_by_id(&slot_id).await?
        .ok_or(AppError::NotFound("Time slot not found".into()))?;

    if !user.can_manage_professional(&slot.professional_id) {
        return Err(AppError::Forbidden("Not allowed to manage this schedule".into()));
    }

    if !state.slot_repo.transition_status(&slot_id, SLOT_BREAK, SLOT_AVAILABLE).await? {
        return Err(AppError::Conflict("Slot is not a break".into()));
    }

    info!("Slot {} released back to available", slot_id);
    Ok(Json(serde_json::json!({"status": "AVAILABLE"})))
}
