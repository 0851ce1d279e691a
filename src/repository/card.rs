use anyhow::Result;
use chrono::NaiveDate;

use crate::{
    constants::CardStatus,
    infrastructure::database::DbPoolManager,
    models::{Card, CardListing},
};

const LISTING_QUERY: &str = "select c.id, c.player_id, p.full_name as player_name, c.description,
                                    c.amount_cents, c.date, c.status
                             from cards c
                             inner join players p on p.id = c.player_id";

pub async fn insert(
    db: &DbPoolManager,
    player_id: u64,
    description: &str,
    amount_cents: i64,
    date: NaiveDate,
) -> Result<u64> {
    let id = sqlx::query(
        "insert into cards (player_id, description, amount_cents, date, status)
         values (?, ?, ?, ?, ?)",
    )
    .bind(player_id)
    .bind(description)
    .bind(amount_cents)
    .bind(date)
    .bind(CardStatus::Pending.as_str())
    .execute(db.as_ref())
    .await?
    .last_insert_id();

    Ok(id)
}

/// Returns false when the card does not exist or was already paid.
pub async fn mark_paid(db: &DbPoolManager, id: u64) -> Result<bool> {
    let updated = sqlx::query("update cards set status = ? where id = ? and status = ?")
        .bind(CardStatus::Paid.as_str())
        .bind(id)
        .bind(CardStatus::Pending.as_str())
        .execute(db.as_ref())
        .await?
        .rows_affected();

    Ok(updated > 0)
}

/// `(count, total cents)` of unpaid cards.
pub async fn pending_summary(db: &DbPoolManager) -> Result<(i64, i64)> {
    let summary = sqlx::query_as::<_, (i64, i64)>(
        "select count(*), cast(coalesce(sum(amount_cents), 0) as signed)
         from cards where status = ?",
    )
    .bind(CardStatus::Pending.as_str())
    .fetch_one(db.as_ref())
    .await?;

    Ok(summary)
}

pub async fn fetch_by_player(db: &DbPoolManager, player_id: u64) -> Result<Vec<Card>> {
    let cards = sqlx::query_as::<_, Card>(
        "select id, player_id, description, amount_cents, date, status, created_at, updated_at
         from cards where player_id = ? order by date desc, id desc",
    )
    .bind(player_id)
    .fetch_all(db.as_ref())
    .await?;

    Ok(cards)
}

/// Cards dated in `[from, until)`.
pub async fn fetch_between(
    db: &DbPoolManager,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<CardListing>> {
    let cards = sqlx::query_as::<_, CardListing>(&format!(
        "{LISTING_QUERY} where c.date >= ? and c.date < ? order by c.date, c.id"
    ))
    .bind(from)
    .bind(until)
    .fetch_all(db.as_ref())
    .await?;

    Ok(cards)
}

pub async fn fetch_recent(db: &DbPoolManager, limit: u32) -> Result<Vec<CardListing>> {
    let cards = sqlx::query_as::<_, CardListing>(&format!(
        "{LISTING_QUERY} order by c.date desc, c.id desc limit ?"
    ))
    .bind(limit)
    .fetch_all(db.as_ref())
    .await?;

    Ok(cards)
}
