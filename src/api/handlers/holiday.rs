use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateHolidayRequest;
use crate::domain::models::holiday::ClinicHoliday;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::NaiveDate;
use tracing::info;

pub async fn create_holiday(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateHolidayRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Holiday name is required".into()));
    }

    let holiday = ClinicHoliday::new(payload.date, payload.name);
    let created = state.holiday_repo.create(&holiday).await?;

    info!("Created clinic holiday {} on {}", created.name, created.date);
    Ok(Json(created))
}

pub async fn list_holidays(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    let start_str = params.get("start").ok_or(AppError::Validation("start required".into()))?;
    let end_str = params.get("end").ok_or(AppError::Validation("end required".into()))?;

    let start = NaiveDate::parse_from_str(start_str, "%Y-%m-%d").map_err(|_| AppError::Validation("Invalid start".into()))?;
    let end = NaiveDate::parse_from_str(end_str, "%Y-%m-%d").map_err(|_| AppError::Validation("Invalid end".into()))?;

    let holidays = state.holiday_repo.list_by_range(start, end).await?;
    Ok(Json(holidays))
}

pub async fn delete_holiday(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(date_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date".into()))?;

    state.holiday_repo.delete_by_date(date).await?;
    info!("Deleted clinic holiday on {}", date_str);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
