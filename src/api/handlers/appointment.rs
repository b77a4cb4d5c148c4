use axum::{
    extract::{State, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{BookAppointmentRequest, CancelAppointmentRequest, RescheduleAppointmentRequest},
    responses::SlotView,
};
use crate::domain::models::appointment::{
    Appointment, NewAppointmentParams, APPT_COMPLETED, APPT_CONFIRMED, APPT_PENDING,
};
use crate::domain::models::job::{Job, JOB_CANCELLATION, JOB_CONFIRMATION, JOB_REMINDER, JOB_RESCHEDULE};
use crate::domain::models::time_slot::{SLOT_AVAILABLE, SLOT_BOOKED};
use crate::domain::services::slots::filter_bookable;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

/// Book a slot. Everything up to the repository call is a precondition check
/// against the state as last read; the store re-checks the slot inside the
/// transaction, so a lost race surfaces as Conflict, never a double booking.
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.reason.trim().is_empty() {
        return Err(AppError::Validation("Reason is required".into()));
    }

    if !user.can_act_for_patient(&payload.patient_id) {
        return Err(AppError::Forbidden("Not allowed to book for this patient".into()));
    }

    state.patient_repo.find_by_id(&payload.patient_id).await?
        .ok_or(AppError::NotFound("Patient not found".into()))?;

    let slot = state.slot_repo.find_by_id(&payload.time_slot_id).await?
        .ok_or(AppError::NotFound("Time slot not found".into()))?;

    // The professional comes from the slot; caller input may only confirm it.
    if let Some(ref professional_id) = payload.professional_id {
        if *professional_id != slot.professional_id {
            return Err(AppError::Validation("Professional does not match the selected slot".into()));
        }
    }

    let service = state.service_repo.find_by_id(&payload.service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;
    if !service.active {
        return Err(AppError::Validation("Service is not active".into()));
    }

    if slot.status != SLOT_AVAILABLE {
        return Err(AppError::Conflict("Slot is no longer available".into()));
    }

    let appointment = Appointment::new(NewAppointmentParams {
        patient_id: payload.patient_id,
        professional_id: slot.professional_id.clone(),
        service_id: service.id.clone(),
        time_slot_id: slot.id.clone(),
        service_name: service.name.clone(),
        service_price_cents: service.price_cents,
        reason: payload.reason,
        notes: payload.notes,
    });

    let created = state.appointment_repo.book(&appointment).await?;

    // Notification side effects live outside the transaction boundary;
    // their failure never unwinds a committed booking.
    enqueue_confirmation_jobs(&state, &created.id, slot.start_at).await;

    info!("Appointment {} booked on slot {}", created.id, slot.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let appointments = if user.0.is_staff() {
        state.appointment_repo.list_all().await?
    } else if let Some(ref professional_id) = user.0.professional_id {
        state.appointment_repo.list_by_professional(professional_id).await?
    } else if let Some(ref patient_id) = user.0.patient_id {
        state.appointment_repo.list_by_patient(patient_id).await?
    } else {
        return Err(AppError::Forbidden("No appointments visible for this account".into()));
    };

    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_id(&appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    authorize_view(&user, &appointment)?;
    Ok(Json(appointment))
}

/// Move an appointment to another slot. Re-submitting the slot it already
/// occupies is a no-op success; losing the race for the target slot returns
/// Conflict plus a best-effort list of nearby alternatives.
pub async fn reschedule_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(appointment_id): Path<String>,
    Json(payload): Json<RescheduleAppointmentRequest>,
) -> Result<Response, AppError> {
    let appointment = state.appointment_repo.find_by_id(&appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    authorize_modify(&user, &appointment)?;

    if !appointment.is_open() {
        return Err(AppError::Validation("Cannot reschedule a closed appointment".into()));
    }

    let new_slot = state.slot_repo.find_by_id(&payload.new_time_slot_id).await?
        .ok_or(AppError::NotFound("Target slot not found".into()))?;

    if new_slot.id == appointment.time_slot_id {
        return Ok(Json(appointment).into_response());
    }

    if new_slot.status != SLOT_AVAILABLE {
        let alternatives = suggest_alternatives(&state, &new_slot.professional_id, new_slot.start_at).await;
        return Ok(conflict_with_alternatives("Target slot is no longer available", alternatives));
    }

    match state.appointment_repo.reschedule(&appointment, &new_slot).await {
        Ok(updated) => {
            if let Err(e) = state.job_repo.cancel_jobs_for_appointment(&updated.id).await {
                warn!("Failed to cancel pending jobs for appointment {}: {:?}", updated.id, e);
            }
            enqueue_reschedule_jobs(&state, &updated.id, new_slot.start_at).await;

            info!("Appointment {} rescheduled to slot {}", updated.id, new_slot.id);
            Ok(Json(updated).into_response())
        }
        Err(AppError::Conflict(msg)) => {
            let alternatives = suggest_alternatives(&state, &new_slot.professional_id, new_slot.start_at).await;
            Ok(conflict_with_alternatives(&msg, alternatives))
        }
        Err(e) => Err(e),
    }
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(appointment_id): Path<String>,
    Json(payload): Json<CancelAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = state.appointment_repo.find_by_id(&appointment_id).await?
        .ok_or(AppError::NotFound("Appointment not found".into()))?;

    authorize_modify(&user, &appointment)?;

    if !appointment.is_open() {
        return Err(AppError::Validation("Appointment is already closed".into()));
    }

    let cancelled = state.appointment_repo.cancel(&appointment).await?;

    if let Err(e) = state.job_repo.cancel_jobs_for_appointment(&cancelled.id).await {
        warn!("Failed to cancel pending jobs for appointment {}: {:?}", cancelled.id, e);
    }
    let notice = Job::new(JOB_CANCELLATION, cancelled.id.clone(), Utc::now());
    if let Err(e) = state.job_repo.create(&notice).await {
        warn!("Failed to enqueue cancellation notice for appointment {}: {:?}", cancelled.id, e);
    }

    info!(
        "Appointment {} cancelled{}",
        cancelled.id,
        payload.reason.map(|r| format!(" ({})", r)).unwrap_or_default()
    );
    Ok(Json(cancelled))
}

pub async fn confirm_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    let confirmed = state.appointment_repo
        .transition_status(&appointment_id, APPT_PENDING, APPT_CONFIRMED)
        .await?
        .ok_or(AppError::Conflict("Appointment is not pending".into()))?;

    info!("Appointment {} confirmed", appointment_id);
    Ok(Json(confirmed))
}

pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    let completed = state.appointment_repo
        .transition_status(&appointment_id, APPT_CONFIRMED, APPT_COMPLETED)
        .await?
        .ok_or(AppError::Conflict("Appointment is not confirmed".into()))?;

    info!("Appointment {} completed", appointment_id);
    Ok(Json(completed))
}

fn authorize_view(user: &AuthUser, appointment: &Appointment) -> Result<(), AppError> {
    let allowed = user.0.is_staff()
        || user.0.patient_id.as_deref() == Some(appointment.patient_id.as_str())
        || user.0.professional_id.as_deref() == Some(appointment.professional_id.as_str());
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden("Not allowed to view this appointment".into()))
    }
}

fn authorize_modify(user: &AuthUser, appointment: &Appointment) -> Result<(), AppError> {
    if user.0.is_staff() || user.0.patient_id.as_deref() == Some(appointment.patient_id.as_str()) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Not allowed to modify this appointment".into()))
    }
}

fn conflict_with_alternatives(message: &str, alternatives: Vec<SlotView>) -> Response {
    (
        StatusCode::CONFLICT,
        Json(serde_json::json!({
            "error": message,
            "alternatives": alternatives,
        })),
    ).into_response()
}

/// Best-effort, non-transactional: nearby AVAILABLE slots for the same
/// professional, buffer-filtered. Errors collapse to an empty list.
async fn suggest_alternatives(state: &Arc<AppState>, professional_id: &str, around: DateTime<Utc>) -> Vec<SlotView> {
    let candidates = match state.slot_repo.list_available_near(professional_id, around, 8).await {
        Ok(candidates) if !candidates.is_empty() => candidates,
        _ => return Vec::new(),
    };

    let buffer_min = state.config.buffer_minutes;
    let pad = Duration::minutes(buffer_min);
    let window_start = candidates.iter().map(|s| s.start_at).min().unwrap() - pad;
    let window_end = candidates.iter().map(|s| s.end_at).max().unwrap() + pad;

    let booked: Vec<_> = match state.slot_repo.list_blocking(professional_id, window_start, window_end).await {
        Ok(blocking) => blocking.into_iter().filter(|s| s.status == SLOT_BOOKED).collect(),
        Err(_) => return Vec::new(),
    };

    filter_bookable(candidates, &booked, buffer_min)
        .iter()
        .take(3)
        .map(SlotView::from)
        .collect()
}

async fn enqueue_confirmation_jobs(state: &Arc<AppState>, appointment_id: &str, slot_start: DateTime<Utc>) {
    let confirmation = Job::new(JOB_CONFIRMATION, appointment_id.to_string(), Utc::now());
    if let Err(e) = state.job_repo.create(&confirmation).await {
        warn!("Failed to enqueue confirmation for appointment {}: {:?}", appointment_id, e);
    }

    let remind_at = slot_start - Duration::hours(24);
    if remind_at > Utc::now() {
        let reminder = Job::new(JOB_REMINDER, appointment_id.to_string(), remind_at);
        if let Err(e) = state.job_repo.create(&reminder).await {
            warn!("Failed to enqueue reminder for appointment {}: {:?}", appointment_id, e);
        }
    }
}

async fn enqueue_reschedule_jobs(state: &Arc<AppState>, appointment_id: &str, slot_start: DateTime<Utc>) {
    let notice = Job::new(JOB_RESCHEDULE, appointment_id.to_string(), Utc::now());
    if let Err(e) = state.job_repo.create(&notice).await {
        warn!("Failed to enqueue reschedule notice for appointment {}: {:?}", appointment_id, e);
    }

    let remind_at = slot_start - Duration::hours(24);
    if remind_at > Utc::now() {
        let reminder = Job::new(JOB_REMINDER, appointment_id.to_string(), remind_at);
        if let Err(e) = state.job_repo.create(&reminder).await {
            warn!("Failed to enqueue reminder for appointment {}: {:?}", appointment_id, e);
        }
    }
}
