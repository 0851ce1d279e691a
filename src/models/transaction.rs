use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::TransactionKind;

/// A ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: u64,
    pub kind: String,
    pub category: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub description: String,
    pub receipt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        TransactionKind::from_db(&self.kind)
    }
}
