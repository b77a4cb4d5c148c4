use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateExceptionRequest, CreateRuleRequest, UpdateRuleRequest};
use crate::domain::models::availability::{AvailabilityException, AvailabilityRule, NewRuleParams};
use crate::domain::services::recurrence::Recurrence;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use tracing::info;

fn validate_window(start: &str, end: &str) -> Result<(), AppError> {
    let start_tod = NaiveTime::parse_from_str(start, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid start_time (HH:MM)".into()))?;
    let end_tod = NaiveTime::parse_from_str(end, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid end_time (HH:MM)".into()))?;
    if start_tod >= end_tod {
        return Err(AppError::Validation("start_time must be before end_time".into()));
    }
    Ok(())
}

pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(professional_id): Path<String>,
    Json(payload): Json<CreateRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !user.can_manage_professional(&professional_id) {
        return Err(AppError::Forbidden("Not allowed to manage this schedule".into()));
    }

    state.professional_repo.find_by_id(&professional_id).await?
        .ok_or(AppError::NotFound("Professional not found".into()))?;

    Recurrence::parse(&payload.recurrence)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    validate_window(&payload.start_time, &payload.end_time)?;

    let timezone = payload.timezone.unwrap_or_else(|| state.config.clinic_timezone.clone());
    if timezone.parse::<Tz>().is_err() {
        return Err(AppError::Validation("Invalid timezone".into()));
    }

    if payload.slot_duration_min <= 0 {
        return Err(AppError::Validation("slot_duration_min must be positive".into()));
    }

    let rule = AvailabilityRule::new(NewRuleParams {
        professional_id: professional_id.clone(),
        recurrence: payload.recurrence,
        start_time: payload.start_time,
        end_time: payload.end_time,
        timezone,
        slot_duration_min: payload.slot_duration_min,
    });

    let created = state.availability_repo.create_rule(&rule).await?;
    info!("Created availability rule {} for professional {}", created.id, professional_id);
    Ok(Json(created))
}

pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(professional_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !user.can_manage_professional(&professional_id) {
        return Err(AppError::Forbidden("Not allowed to view this schedule".into()));
    }

    let rules = state.availability_repo.list_rules(&professional_id).await?;
    Ok(Json(rules))
}

pub async fn update_rule(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(rule_id): Path<String>,
    Json(payload): Json<UpdateRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut rule = state.availability_repo.find_rule(&rule_id).await?
        .ok_or(AppError::NotFound("Availability rule not found".into()))?;

    if !user.can_manage_professional(&rule.professional_id) {
        return Err(AppError::Forbidden("Not allowed to manage this schedule".into()));
    }

    if let Some(val) = payload.recurrence {
        Recurrence::parse(&val).map_err(|e| AppError::Validation(e.to_string()))?;
        rule.recurrence = val;
    }
    if let Some(val) = payload.start_time { rule.start_time = val; }
    if let Some(val) = payload.end_time { rule.end_time = val; }
    validate_window(&rule.start_time, &rule.end_time)?;

    if let Some(val) = payload.timezone {
        if val.parse::<Tz>().is_err() {
            return Err(AppError::Validation("Invalid timezone".into()));
        }
        rule.timezone = val;
    }
    if let Some(val) = payload.slot_duration_min {
        if val <= 0 {
            return Err(AppError::Validation("slot_duration_min must be positive".into()));
        }
        rule.slot_duration_min = val;
    }
    if let Some(val) = payload.active { rule.active = val; }

    let updated = state.availability_repo.update_rule(&rule).await?;
    info!("Availability rule updated: {}", rule_id);
    Ok(Json(updated))
}

pub async fn create_exception(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(professional_id): Path<String>,
    Json(payload): Json<CreateExceptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !user.can_manage_professional(&professional_id) {
        return Err(AppError::Forbidden("Not allowed to manage this schedule".into()));
    }

    state.professional_repo.find_by_id(&professional_id).await?
        .ok_or(AppError::NotFound("Professional not found".into()))?;

    // A substitute window needs both ends; a blocking exception needs neither.
    match (&payload.alt_start_time, &payload.alt_end_time) {
        (Some(start), Some(end)) => {
            if payload.is_unavailable {
                return Err(AppError::Validation("A blocking exception cannot carry substitute times".into()));
            }
            validate_window(start, end)?;
        }
        (None, None) => {}
        _ => return Err(AppError::Validation("Substitute window requires both alt_start_time and alt_end_time".into())),
    }

    let mut exception = AvailabilityException::new(professional_id.clone(), payload.date);
    exception.is_unavailable = payload.is_unavailable;
    exception.alt_start_time = payload.alt_start_time;
    exception.alt_end_time = payload.alt_end_time;
    exception.reason = payload.reason;

    let created = state.availability_repo.create_exception(&exception).await?;
    info!("Created exception for professional {} on {}", professional_id, payload.date);
    Ok(Json(created))
}

pub async fn list_exceptions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(professional_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    if !user.can_manage_professional(&professional_id) {
        return Err(AppError::Forbidden("Not allowed to view this schedule".into()));
    }

    let start_str = params.get("start").ok_or(AppError::Validation("start required".into()))?;
    let end_str = params.get("end").ok_or(AppError::Validation("end required".into()))?;

    let start = NaiveDate::parse_from_str(start_str, "%Y-%m-%d").map_err(|_| AppError::Validation("Invalid start".into()))?;
    let end = NaiveDate::parse_from_str(end_str, "%Y-%m-%d").map_err(|_| AppError::Validation("Invalid end".into()))?;

    let exceptions = state.availability_repo.list_exceptions_by_range(&professional_id, start, end).await?;
    Ok(Json(exceptions))
}

pub async fn delete_exception(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path((professional_id, exception_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !user.can_manage_professional(&professional_id) {
        return Err(AppError::Forbidden("Not allowed to manage this schedule".into()));
    }

    state.availability_repo.delete_exception(&professional_id, &exception_id).await?;
    info!("Deleted exception {} for professional {}", exception_id, professional_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
