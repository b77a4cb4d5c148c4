use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateServiceRequest, UpdateServiceRequest};
use crate::domain::models::service::Service;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Service name is required".into()));
    }
    if payload.price_cents < 0 {
        return Err(AppError::Validation("Price cannot be negative".into()));
    }

    let service = Service::new(payload.name, payload.description.unwrap_or_default(), payload.price_cents);
    let created = state.service_repo.create(&service).await?;

    info!("Created service: {}", created.id);
    Ok(Json(created))
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_repo.list().await?;
    Ok(Json(services))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(service_id): Path<String>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.require_staff()?;

    let mut service = state.service_repo.find_by_id(&service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    if let Some(val) = payload.name { service.name = val; }
    if let Some(val) = payload.description { service.description = val; }
    if let Some(val) = payload.price_cents {
        if val < 0 {
            return Err(AppError::Validation("Price cannot be negative".into()));
        }
        service.price_cents = val;
    }
    if let Some(val) = payload.active { service.active = val; }

    let updated = state.service_repo.update(&service).await?;
    info!("Service updated: {}", service_id);
    Ok(Json(updated))
}
