use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Professional {
    pub id: String,
    pub full_name: String,
    pub specialty: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Professional {
    pub fn new(full_name: String, specialty: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            full_name,
            specialty,
            active: true,
            created_at: Utc::now(),
        }
    }
}
