use anyhow::Result;
use chrono::NaiveDate;
use sqlx::types::Json;

use crate::{infrastructure::database::DbPoolManager, models::Association};

const ASSOCIATION_COLUMNS: &str = "id, name, description, founded_date, address, phone, email, \
                                   logo, facebook, twitter, instagram, commission, game_schedule, \
                                   monthly_fee_cents, created_at, updated_at";

pub async fn fetch_by_id(db: &DbPoolManager, id: u64) -> Result<Option<Association>> {
    let association = sqlx::query_as::<_, Association>(&format!(
        "select {ASSOCIATION_COLUMNS} from associations where id = ?"
    ))
    .bind(id)
    .fetch_optional(db.as_ref())
    .await?;

    Ok(association)
}

/// The association behind an active slug.
pub async fn fetch_by_slug(db: &DbPoolManager, slug: &str) -> Result<Option<Association>> {
    let association = sqlx::query_as::<_, Association>(&format!(
        "select {ASSOCIATION_COLUMNS} from associations
         where id = (select association_id from slugs where slug = ? and is_active = true)"
    ))
    .bind(slug.trim().to_lowercase())
    .fetch_optional(db.as_ref())
    .await?;

    Ok(association)
}

pub async fn fetch_by_name(db: &DbPoolManager, name: &str) -> Result<Option<Association>> {
    let association = sqlx::query_as::<_, Association>(&format!(
        "select {ASSOCIATION_COLUMNS} from associations where name = ?"
    ))
    .bind(name)
    .fetch_optional(db.as_ref())
    .await?;

    Ok(association)
}

pub struct NewAssociation<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub founded_date: NaiveDate,
    pub address: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub facebook: Option<&'a str>,
    pub twitter: Option<&'a str>,
    pub instagram: Option<&'a str>,
    pub commission: Vec<String>,
    pub game_schedule: &'a str,
    pub monthly_fee_cents: i64,
}

pub async fn insert(db: &DbPoolManager, association: &NewAssociation<'_>) -> Result<u64> {
    let id = sqlx::query(
        "insert into associations
            (name, description, founded_date, address, phone, email, facebook, twitter,
             instagram, commission, game_schedule, monthly_fee_cents)
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(association.name)
    .bind(association.description)
    .bind(association.founded_date)
    .bind(association.address)
    .bind(association.phone)
    .bind(association.email)
    .bind(association.facebook)
    .bind(association.twitter)
    .bind(association.instagram)
    .bind(Json(&association.commission))
    .bind(association.game_schedule)
    .bind(association.monthly_fee_cents)
    .execute(db.as_ref())
    .await?
    .last_insert_id();

    Ok(id)
}

pub async fn set_monthly_fee(db: &DbPoolManager, id: u64, amount_cents: i64) -> Result<()> {
    sqlx::query("update associations set monthly_fee_cents = ? where id = ?")
        .bind(amount_cents)
        .bind(id)
        .execute(db.as_ref())
        .await?;

    Ok(())
}
