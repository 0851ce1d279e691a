use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MonthlyStatus;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Monthly {
    pub id: u64,
    pub player_id: u64,
    pub amount_cents: i64,
    pub reference_month: String,
    pub status: String,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Monthly {
    pub fn status(&self) -> MonthlyStatus {
        MonthlyStatus::from_db(&self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonthlyListing {
    pub id: u64,
    pub player_id: u64,
    pub player_name: String,
    pub amount_cents: i64,
    pub reference_month: String,
    pub status: String,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
}

impl MonthlyListing {
    pub fn status(&self) -> MonthlyStatus {
        MonthlyStatus::from_db(&self.status)
    }
}
