use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateProfessionalRequest, UpdateProfessionalRequest};
use crate::domain::models::professional::Professional;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_professional(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateProfessionalRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    if payload.full_name.trim().is_empty() {
        return Err(AppError::Validation("Full name is required".into()));
    }

    let professional = Professional::new(payload.full_name, payload.specialty);
    let created = state.professional_repo.create(&professional).await?;

    info!("Created professional: {}", created.id);
    Ok(Json(created))
}

pub async fn list_professionals(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let professionals = state.professional_repo.list().await?;
    Ok(Json(professionals))
}

pub async fn get_professional(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let professional = state.professional_repo.find_by_id(&professional_id).await?
        .ok_or(AppError::NotFound("Professional not found".into()))?;
    Ok(Json(professional))
}

pub async fn update_professional(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(professional_id): Path<String>,
    Json(payload): Json<UpdateProfessionalRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    let mut professional = state.professional_repo.find_by_id(&professional_id).await?
        .ok_or(AppError::NotFound("Professional not found".into()))?;

    if let Some(val) = payload.full_name { professional.full_name = val; }
    if let Some(val) = payload.specialty { professional.specialty = val; }
    if let Some(val) = payload.active { professional.active = val; }

    let updated = state.professional_repo.update(&professional).await?;
    info!("Professional updated: {}", professional_id);
    Ok(Json(updated))
}
