use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_STAFF: &str = "STAFF";
pub const ROLE_PROFESSIONAL: &str = "PROFESSIONAL";
pub const ROLE_PATIENT: &str = "PATIENT";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub professional_id: Option<String>,
    pub patient_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String, role: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            role,
            professional_id: None,
            patient_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role == ROLE_ADMIN || self.role == ROLE_STAFF
    }
}
