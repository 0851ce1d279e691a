use anyhow::Result;

use crate::{
    infrastructure::database::DbPoolManager, models::AllowedUser, repository::is_unique_violation,
};

pub async fn fetch_all(db: &DbPoolManager) -> Result<Vec<AllowedUser>> {
    let entries = sqlx::query_as::<_, AllowedUser>(
        "select id, cpf, name, is_used, created_at, updated_at
         from allowed_users order by created_at desc, id desc",
    )
    .fetch_all(db.as_ref())
    .await?;

    Ok(entries)
}

/// `false` when the CPF is already on the list.
pub async fn insert(db: &DbPoolManager, cpf: &str, name: &str) -> Result<bool> {
    let result = sqlx::query("insert into allowed_users (cpf, name) values (?, ?)")
        .bind(cpf)
        .bind(name)
        .execute(db.as_ref())
        .await;

    match result {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Used entries are kept; they record who registered.
pub async fn delete_unused(db: &DbPoolManager, cpf: &str) -> Result<bool> {
    let deleted = sqlx::query("delete from allowed_users where cpf = ? and is_used = false")
        .bind(cpf)
        .execute(db.as_ref())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}
