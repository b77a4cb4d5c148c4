use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// A clinic-wide closure date. Suppresses rule expansion for every
/// professional regardless of their own exceptions.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ClinicHoliday {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ClinicHoliday {
    pub fn new(date: NaiveDate, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            name,
            created_at: Utc::now(),
        }
    }
}
