use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateUserRequest;
use crate::domain::models::user::{User, ROLE_ADMIN, ROLE_PATIENT, ROLE_PROFESSIONAL, ROLE_STAFF};
use std::sync::Arc;
use crate::error::AppError;
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use rand::rngs::OsRng;
use tracing::info;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    admin: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    admin.require_admin()?;

    match payload.role.as_str() {
        ROLE_ADMIN | ROLE_STAFF | ROLE_PROFESSIONAL | ROLE_PATIENT => {},
        _ => return Err(AppError::Validation("Invalid role".into())),
    }

    if state.user_repo.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    // Account links must point at existing records.
    if let Some(ref professional_id) = payload.professional_id {
        state.professional_repo.find_by_id(professional_id).await?
            .ok_or(AppError::NotFound("Professional not found".into()))?;
    }
    if let Some(ref patient_id) = payload.patient_id {
        state.patient_repo.find_by_id(patient_id).await?
            .ok_or(AppError::NotFound("Patient not found".into()))?;
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let mut user = User::new(payload.username, password_hash, payload.role);
    user.professional_id = payload.professional_id;
    user.patient_id = payload.patient_id;

    let created = state.user_repo.create(&user).await?;

    info!("Created user: {} ({})", created.id, created.role);

    Ok(Json(serde_json::json!({
        "id": created.id,
        "username": created.username,
        "role": created.role,
        "professional_id": created.professional_id,
        "patient_id": created.patient_id,
        "created_at": created.created_at
    })))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    admin: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    admin.require_admin()?;

    let users = state.user_repo.list().await?;
    let safe_users: Vec<_> = users.into_iter().map(|u| serde_json::json!({
        "id": u.id,
        "username": u.username,
        "role": u.role,
        "professional_id": u.professional_id,
        "patient_id": u.patient_id,
        "created_at": u.created_at
    })).collect();

    Ok(Json(safe_users))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    admin: AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    admin.require_admin()?;

    if admin.0.id == user_id {
        return Err(AppError::Conflict("Cannot delete yourself".into()));
    }

    let target = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    state.user_repo.delete(&target.id).await?;
    info!("Deleted user {}", user_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
