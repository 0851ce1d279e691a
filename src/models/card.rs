use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::CardStatus;

/// A penalty or extra fee charged to a player.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    pub id: u64,
    pub player_id: u64,
    pub description: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn status(&self) -> CardStatus {
        CardStatus::from_db(&self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CardListing {
    pub id: u64,
    pub player_id: u64,
    pub player_name: String,
    pub description: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub status: String,
}

impl CardListing {
    pub fn status(&self) -> CardStatus {
        CardStatus::from_db(&self.status)
    }
}
