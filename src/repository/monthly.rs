use anyhow::Result;
use chrono::NaiveDate;

use crate::{
    constants::MonthlyStatus,
    infrastructure::database::DbPoolManager,
    models::{Monthly, MonthlyListing},
    repository::is_unique_violation,
};

const LISTING_QUERY: &str = "select m.id, m.player_id, p.full_name as player_name, m.amount_cents,
                                    m.reference_month, m.status, m.payment_date, m.due_date
                             from monthlies m
                             inner join players p on p.id = m.player_id";

/// `None` when the player already has dues for that month.
pub async fn create(
    db: &DbPoolManager,
    player_id: u64,
    amount_cents: i64,
    reference_month: &str,
    due_date: NaiveDate,
) -> Result<Option<u64>> {
    let result = sqlx::query(
        "insert into monthlies (player_id, amount_cents, reference_month, status, due_date)
         values (?, ?, ?, ?, ?)",
    )
    .bind(player_id)
    .bind(amount_cents)
    .bind(reference_month)
    .bind(MonthlyStatus::Open.as_str())
    .bind(due_date)
    .execute(db.as_ref())
    .await;

    match result {
        Ok(done) => Ok(Some(done.last_insert_id())),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Dues for every active player that has none for `reference_month` yet.
/// Returns how many were created.
pub async fn generate_for_month(
    db: &DbPoolManager,
    reference_month: &str,
    amount_cents: i64,
    due_date: NaiveDate,
) -> Result<u64> {
    let created = sqlx::query(
        "insert ignore into monthlies (player_id, amount_cents, reference_month, status, due_date)
         select id, ?, ?, ?, ? from players where is_active = true",
    )
    .bind(amount_cents)
    .bind(reference_month)
    .bind(MonthlyStatus::Open.as_str())
    .bind(due_date)
    .execute(db.as_ref())
    .await?
    .rows_affected();

    Ok(created)
}

/// `payment_date` is set for paid dues and cleared otherwise.
pub async fn update_status(
    db: &DbPoolManager,
    id: u64,
    status: MonthlyStatus,
    today: NaiveDate,
) -> Result<bool> {
    let payment_date = (status == MonthlyStatus::Paid).then_some(today);

    let found = sqlx::query_scalar::<_, u64>("select id from monthlies where id = ?")
        .bind(id)
        .fetch_optional(db.as_ref())
        .await?;

    if found.is_none() {
        return Ok(false);
    }

    sqlx::query("update monthlies set status = ?, payment_date = ? where id = ?")
        .bind(status.as_str())
        .bind(payment_date)
        .bind(id)
        .execute(db.as_ref())
        .await?;

    Ok(true)
}

pub async fn mark_overdue(db: &DbPoolManager, today: NaiveDate) -> Result<u64> {
    let updated = sqlx::query("update monthlies set status = ? where status = ? and due_date < ?")
        .bind(MonthlyStatus::Overdue.as_str())
        .bind(MonthlyStatus::Open.as_str())
        .bind(today)
        .execute(db.as_ref())
        .await?
        .rows_affected();

    Ok(updated)
}

pub async fn count_pending(db: &DbPoolManager) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "select count(*) from monthlies where status in (?, ?)",
    )
    .bind(MonthlyStatus::Open.as_str())
    .bind(MonthlyStatus::Overdue.as_str())
    .fetch_one(db.as_ref())
    .await?;

    Ok(count)
}

/// `(status, count)` pairs, for one reference month or overall.
pub async fn count_by_status(
    db: &DbPoolManager,
    reference_month: Option<&str>,
) -> Result<Vec<(String, i64)>> {
    let counts = sqlx::query_as::<_, (String, i64)>(
        "select status, count(*) from monthlies
         where ? is null or reference_month = ?
         group by status",
    )
    .bind(reference_month)
    .bind(reference_month)
    .fetch_all(db.as_ref())
    .await?;

    Ok(counts)
}

pub async fn fetch_by_player(db: &DbPoolManager, player_id: u64) -> Result<Vec<Monthly>> {
    let monthlies = sqlx::query_as::<_, Monthly>(
        "select id, player_id, amount_cents, reference_month, status, payment_date, due_date,
                created_at, updated_at
         from monthlies where player_id = ? order by reference_month desc",
    )
    .bind(player_id)
    .fetch_all(db.as_ref())
    .await?;

    Ok(monthlies)
}

pub async fn fetch_recent(db: &DbPoolManager, limit: u32) -> Result<Vec<MonthlyListing>> {
    let monthlies = sqlx::query_as::<_, MonthlyListing>(&format!(
        "{LISTING_QUERY} order by m.reference_month desc, p.full_name limit ?"
    ))
    .bind(limit)
    .fetch_all(db.as_ref())
    .await?;

    Ok(monthlies)
}
