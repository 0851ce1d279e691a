use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Association {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub founded_date: NaiveDate,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub logo: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub commission: Json<Vec<String>>,
    pub game_schedule: String,
    pub monthly_fee_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the public landing page shows.
#[derive(Debug, Clone, Serialize)]
pub struct AssociationProfile {
    pub association: Association,
    pub slug: String,
    pub total_players: i64,
}
