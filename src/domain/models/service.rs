use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A bookable clinic service. Name and price are snapshotted onto
/// appointments at booking time, so edits here never rewrite history.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn new(name: String, description: String, price_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            price_cents,
            active: true,
            created_at: Utc::now(),
        }
    }
}
