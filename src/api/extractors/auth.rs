use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use crate::domain::models::user::{User, ROLE_ADMIN};
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::Span;

pub struct AuthUser(pub User);

impl AuthUser {
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.0.is_staff() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Staff role required".into()))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.0.role == ROLE_ADMIN {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin role required".into()))
        }
    }

    /// Staff act for any patient; a patient only for themself.
    pub fn can_act_for_patient(&self, patient_id: &str) -> bool {
        self.0.is_staff() || self.0.patient_id.as_deref() == Some(patient_id)
    }

    /// Staff manage any professional's schedule; a professional only their own.
    pub fn can_manage_professional(&self, professional_id: &str) -> bool {
        self.0.is_staff() || self.0.professional_id.as_deref() == Some(professional_id)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let access_token = cookies.get("access_token")
            .ok_or(StatusCode::UNAUTHORIZED)?
            .value()
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&["clinic-frontend"]);

        let token_data = decode::<Claims>(&access_token, &decoding_key, &validation)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let method = &parts.method;
        if method != "GET" && method != "HEAD" && method != "OPTIONS" {
            let csrf_header_val = parts.headers.get("X-CSRF-Token")
                .ok_or(StatusCode::FORBIDDEN)?
                .to_str()
                .map_err(|_| StatusCode::FORBIDDEN)?;

            if csrf_header_val != token_data.claims.csrf_token {
                return Err(StatusCode::FORBIDDEN);
            }
        }

        let user = User {
            id: token_data.claims.sub.clone(),
            username: "from_jwt".to_string(),
            password_hash: "".to_string(),
            role: token_data.claims.role,
            professional_id: token_data.claims.professional_id,
            patient_id: token_data.claims.patient_id,
            created_at: chrono::Utc::now(),
        };

        Span::current().record("user_id", &user.id);
        Span::current().record("role", &user.role);

        Ok(AuthUser(user))
    }
}
