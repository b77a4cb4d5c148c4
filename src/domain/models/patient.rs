use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Patient {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn new(full_name: String, email: String, phone: Option<String>, date_of_birth: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            full_name,
            email,
            phone,
            date_of_birth,
            created_at: Utc::now(),
        }
    }
}
