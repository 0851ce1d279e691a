use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub id: u64,
    pub user_id: u64,
    pub full_name: String,
    pub nickname: String,
    pub position: String,
    pub shirt_number: u8,
    pub birth_date: NaiveDate,
    pub phone: String,
    pub address: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Player row joined with the owner's account email.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlayerListing {
    pub id: u64,
    pub full_name: String,
    pub nickname: String,
    pub position: String,
    pub shirt_number: u8,
    pub phone: String,
    pub is_active: bool,
    pub email: String,
    pub pending_monthlies: i64,
}
