use anyhow::Result;
use chrono::NaiveDate;

use crate::{
    constants::{Position, Role},
    infrastructure::database::DbPoolManager,
    models::{Player, PlayerListing},
    repository::is_unique_violation,
};

const PLAYER_COLUMNS: &str = "id, user_id, full_name, nickname, position, shirt_number, \
                              birth_date, phone, address, is_active, created_at, updated_at";

pub struct NewPlayer<'a> {
    pub full_name: &'a str,
    pub nickname: &'a str,
    pub position: Position,
    pub shirt_number: u8,
    pub birth_date: NaiveDate,
    pub phone: &'a str,
    pub address: &'a str,
    pub email: &'a str,
    pub cpf: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatePlayerOutcome {
    Created { user_id: u64, player_id: u64 },
    /// Email or CPF already belongs to an account.
    Duplicate,
}

/// Creates the player's login and the player record together.
pub async fn create_with_user(
    db: &DbPoolManager,
    player: &NewPlayer<'_>,
) -> Result<CreatePlayerOutcome> {
    let mut tx = db.begin().await?;

    let user = sqlx::query(
        "insert into users (name, email, cpf, password_hash, role) values (?, ?, ?, ?, ?)",
    )
    .bind(player.full_name)
    .bind(player.email)
    .bind(player.cpf)
    .bind(player.password_hash)
    .bind(Role::Player.as_str())
    .execute(&mut *tx)
    .await;

    let user_id = match user {
        Ok(done) => done.last_insert_id(),
        Err(e) if is_unique_violation(&e) => {
            tx.rollback().await?;
            return Ok(CreatePlayerOutcome::Duplicate);
        },
        Err(e) => return Err(e.into()),
    };

    let player_id = sqlx::query(
        "insert into players
            (user_id, full_name, nickname, position, shirt_number, birth_date, phone, address)
         values (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(player.full_name)
    .bind(player.nickname)
    .bind(player.position.as_str())
    .bind(player.shirt_number)
    .bind(player.birth_date)
    .bind(player.phone)
    .bind(player.address)
    .execute(&mut *tx)
    .await?
    .last_insert_id();

    tx.commit().await?;

    Ok(CreatePlayerOutcome::Created { user_id, player_id })
}

pub async fn fetch_by_id(db: &DbPoolManager, id: u64) -> Result<Option<Player>> {
    let player =
        sqlx::query_as::<_, Player>(&format!("select {PLAYER_COLUMNS} from players where id = ?"))
            .bind(id)
            .fetch_optional(db.as_ref())
            .await?;

    Ok(player)
}

pub async fn fetch_by_user(db: &DbPoolManager, user_id: u64) -> Result<Option<Player>> {
    let player = sqlx::query_as::<_, Player>(&format!(
        "select {PLAYER_COLUMNS} from players where user_id = ?"
    ))
    .bind(user_id)
    .fetch_optional(db.as_ref())
    .await?;

    Ok(player)
}

/// Players with their account email and count of unpaid dues, optionally
/// filtered by a name or nickname fragment.
pub async fn fetch_listing(db: &DbPoolManager, query: Option<&str>) -> Result<Vec<PlayerListing>> {
    let pattern = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")));

    let players = sqlx::query_as::<_, PlayerListing>(
        "select p.id, p.full_name, p.nickname, p.position, p.shirt_number, p.phone,
                p.is_active, u.email,
                (select count(*) from monthlies m
                  where m.player_id = p.id and m.status in ('em_aberto', 'vencido'))
                  as pending_monthlies
         from players p
         inner join users u on u.id = p.user_id
         where ? is null or p.full_name like ? or p.nickname like ?
         order by p.is_active desc, p.full_name",
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(db.as_ref())
    .await?;

    Ok(players)
}

/// `(id, full_name)` of active players, for select boxes.
pub async fn fetch_active_names(db: &DbPoolManager) -> Result<Vec<(u64, String)>> {
    let names = sqlx::query_as::<_, (u64, String)>(
        "select id, full_name from players where is_active = true order by full_name",
    )
    .fetch_all(db.as_ref())
    .await?;

    Ok(names)
}

pub async fn count_all(db: &DbPoolManager) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("select count(*) from players")
        .fetch_one(db.as_ref())
        .await?;

    Ok(count)
}

pub async fn count_active(db: &DbPoolManager) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("select count(*) from players where is_active = true")
        .fetch_one(db.as_ref())
        .await?;

    Ok(count)
}
