use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreatePatientRequest;
use crate::domain::models::patient::Patient;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreatePatientRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    if payload.full_name.trim().is_empty() {
        return Err(AppError::Validation("Full name is required".into()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation("Invalid email".into()));
    }

    let patient = Patient::new(payload.full_name, payload.email, payload.phone, payload.date_of_birth);
    let created = state.patient_repo.create(&patient).await?;

    info!("Created patient: {}", created.id);
    Ok(Json(created))
}

pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    let patients = state.patient_repo.list().await?;
    Ok(Json(patients))
}

pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(patient_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !user.can_act_for_patient(&patient_id) {
        return Err(AppError::Forbidden("Not allowed to view this patient".into()));
    }

    let patient = state.patient_repo.find_by_id(&patient_id).await?
        .ok_or(AppError::NotFound("Patient not found".into()))?;
    Ok(Json(patient))
}
