use anyhow::Result;
use chrono::NaiveDate;

use crate::{
    constants::TransactionKind, infrastructure::database::DbPoolManager, models::Transaction,
};

const TRANSACTION_COLUMNS: &str =
    "id, kind, category, amount_cents, date, description, receipt, created_at, updated_at";

pub struct NewTransaction<'a> {
    pub kind: TransactionKind,
    pub category: &'a str,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub description: &'a str,
    pub receipt: Option<&'a str>,
}

pub async fn insert(db: &DbPoolManager, transaction: &NewTransaction<'_>) -> Result<u64> {
    let id = sqlx::query(
        "insert into transactions (kind, category, amount_cents, date, description, receipt)
         values (?, ?, ?, ?, ?, ?)",
    )
    .bind(transaction.kind.as_str())
    .bind(transaction.category)
    .bind(transaction.amount_cents)
    .bind(transaction.date)
    .bind(transaction.description)
    .bind(transaction.receipt)
    .execute(db.as_ref())
    .await?
    .last_insert_id();

    Ok(id)
}

/// Transactions dated on or after `from`.
pub async fn fetch_since(db: &DbPoolManager, from: NaiveDate) -> Result<Vec<Transaction>> {
    let transactions = sqlx::query_as::<_, Transaction>(&format!(
        "select {TRANSACTION_COLUMNS} from transactions where date >= ? order by date desc, id desc"
    ))
    .bind(from)
    .fetch_all(db.as_ref())
    .await?;

    Ok(transactions)
}

/// Transactions in `[from, until)`.
pub async fn fetch_between(
    db: &DbPoolManager,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<Transaction>> {
    let transactions = sqlx::query_as::<_, Transaction>(&format!(
        "select {TRANSACTION_COLUMNS} from transactions
         where date >= ? and date < ? order by date, id"
    ))
    .bind(from)
    .bind(until)
    .fetch_all(db.as_ref())
    .await?;

    Ok(transactions)
}

pub async fn fetch_recent(db: &DbPoolManager, limit: u32) -> Result<Vec<Transaction>> {
    let transactions = sqlx::query_as::<_, Transaction>(&format!(
        "select {TRANSACTION_COLUMNS} from transactions order by date desc, id desc limit ?"
    ))
    .bind(limit)
    .fetch_all(db.as_ref())
    .await?;

    Ok(transactions)
}

pub async fn receipt_exists(db: &DbPoolManager, receipt: &str) -> Result<bool> {
    let found = sqlx::query_scalar::<_, u64>("select id from transactions where receipt = ? limit 1")
        .bind(receipt)
        .fetch_optional(db.as_ref())
        .await?;

    Ok(found.is_some())
}
