use anyhow::Result;

use crate::{
    constants::Role,
    infrastructure::database::DbPoolManager,
    models::User,
    repository::is_unique_violation,
};

const USER_COLUMNS: &str =
    "id, name, email, cpf, password_hash, role, is_active, created_at, updated_at";

pub async fn fetch_by_email(db: &DbPoolManager, email: &str) -> Result<Option<User>> {
    let user =
        sqlx::query_as::<_, User>(&format!("select {USER_COLUMNS} from users where email = ?"))
            .bind(email)
            .fetch_optional(db.as_ref())
            .await?;

    Ok(user)
}

pub async fn fetch_by_cpf(db: &DbPoolManager, cpf: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("select {USER_COLUMNS} from users where cpf = ?"))
        .bind(cpf)
        .fetch_optional(db.as_ref())
        .await?;

    Ok(user)
}

pub async fn fetch_all(db: &DbPoolManager) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "select {USER_COLUMNS} from users order by role, name"
    ))
    .fetch_all(db.as_ref())
    .await?;

    Ok(users)
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub cpf: Option<&'a str>,
    pub password_hash: &'a str,
    pub role: Role,
}

/// `None` when the email or CPF is already registered.
pub async fn create(db: &DbPoolManager, user: &NewUser<'_>) -> Result<Option<u64>> {
    let result = sqlx::query(
        "insert into users (name, email, cpf, password_hash, role) values (?, ?, ?, ?, ?)",
    )
    .bind(user.name)
    .bind(user.email)
    .bind(user.cpf)
    .bind(user.password_hash)
    .bind(user.role.as_str())
    .execute(db.as_ref())
    .await;

    match result {
        Ok(done) => Ok(Some(done.last_insert_id())),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// `None` when no such user exists.
pub async fn fetch_is_active(db: &DbPoolManager, id: u64) -> Result<Option<bool>> {
    let is_active = sqlx::query_scalar::<_, bool>("select is_active from users where id = ?")
        .bind(id)
        .fetch_optional(db.as_ref())
        .await?;

    Ok(is_active)
}

/// Returns false when no such user exists.
pub async fn set_active(db: &DbPoolManager, id: u64, is_active: bool) -> Result<bool> {
    let found = sqlx::query_scalar::<_, u64>("select id from users where id = ?")
        .bind(id)
        .fetch_optional(db.as_ref())
        .await?;

    if found.is_none() {
        return Ok(false);
    }

    sqlx::query("update users set is_active = ? where id = ?")
        .bind(is_active)
        .bind(id)
        .execute(db.as_ref())
        .await?;

    Ok(true)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    Created(u64),
    /// No unused allowlist entry for the CPF.
    NotAllowed,
    EmailTaken,
    CpfTaken,
}

/// Claims the allowlist entry and inserts the user in one transaction.
///
/// The claim is a conditional update, so of two racing registrations for
/// the same CPF the second blocks on the row lock and then matches nothing.
pub async fn enroll(db: &DbPoolManager, enrollment: &Enrollment) -> Result<EnrollOutcome> {
    let mut tx = db.begin().await?;

    let claimed = sqlx::query(
        "update allowed_users set is_used = true where cpf = ? and is_used = false",
    )
    .bind(&enrollment.cpf)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if claimed == 0 {
        tx.rollback().await?;
        return Ok(EnrollOutcome::NotAllowed);
    }

    let existing = sqlx::query_as::<_, (String, Option<String>)>(
        "select email, cpf from users where email = ? or cpf = ? limit 1",
    )
    .bind(&enrollment.email)
    .bind(&enrollment.cpf)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some((email, _)) = existing {
        tx.rollback().await?;

        return Ok(if email == enrollment.email {
            EnrollOutcome::EmailTaken
        } else {
            EnrollOutcome::CpfTaken
        });
    }

    let inserted = sqlx::query(
        "insert into users (name, email, cpf, password_hash, role) values (?, ?, ?, ?, ?)",
    )
    .bind(&enrollment.name)
    .bind(&enrollment.email)
    .bind(&enrollment.cpf)
    .bind(&enrollment.password_hash)
    .bind(Role::Player.as_str())
    .execute(&mut *tx)
    .await;

    let user_id = match inserted {
        Ok(done) => done.last_insert_id(),
        Err(e) if is_unique_violation(&e) => {
            tx.rollback().await?;
            return Ok(EnrollOutcome::EmailTaken);
        },
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;

    Ok(EnrollOutcome::Created(user_id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::{config::Config, infrastructure::database, repository::allowed_user};

    // unique per run so reruns against the same database do not collide
    fn run_suffix() -> String {
        format!("{:011}", Utc::now().timestamp_micros().rem_euclid(100_000_000_000))
    }

    #[tokio::test]
    #[ignore = "needs a MySQL database configured through DATABASE_*"]
    async fn racing_enrollments_claim_the_entry_once() {
        let config = Config::from_env().unwrap();
        let db = database::create_pool(&config.database).await.unwrap();
        database::run_migrations(&db).await.unwrap();

        let cpf = run_suffix();
        assert!(allowed_user::insert(&db, &cpf, "Corrida").await.unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = Arc::clone(&db);
                let enrollment = Enrollment {
                    name: format!("Corrida {i}"),
                    email: format!("race{i}-{cpf}@example.com"),
                    cpf: cpf.clone(),
                    password_hash: "x".into(),
                };

                tokio::spawn(async move { enroll(&db, &enrollment).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                EnrollOutcome::Created(_) => created += 1,
                outcome => assert_eq!(outcome, EnrollOutcome::NotAllowed),
            }
        }

        assert_eq!(created, 1);
        assert!(fetch_by_cpf(&db, &cpf).await.unwrap().is_some());
    }
}
