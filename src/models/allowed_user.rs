use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pre-authorized CPF. Each entry permits exactly one registration.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AllowedUser {
    pub id: u64,
    pub cpf: String,
    pub name: String,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
