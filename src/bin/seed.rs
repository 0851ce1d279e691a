//! Populates a fresh database: the association, its slug, the committee
//! account and the first allowlist entries. Safe to run more than once.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dotenvy::dotenv;
use porto::{
    config::Config,
    constants::Role,
    infrastructure::database,
    repository::{
        self,
        association::NewAssociation,
        user::NewUser,
    },
    usecases::password::hash_password,
};
use tracing_subscriber::EnvFilter;

const ASSOCIATION_NAME: &str = "Associação de Porto dos Santos";

const ALLOWED: [(&str, &str); 8] = [
    ("52998224725", "Mauricio Porto"),
    ("11144477735", "Stivie"),
    ("39053344705", "Bugari"),
    ("12345678909", "João Silva"),
    ("98765432100", "Maria Santos"),
    ("11122233396", "Pedro Oliveira"),
    ("55566677720", "Carlos Souza"),
    ("99988877714", "Ana Costa"),
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Arc::new(Config::from_env()?);
    let db = database::create_pool(&config.database).await?;
    database::run_migrations(&db).await?;

    let association_id = match repository::association::fetch_by_name(&db, ASSOCIATION_NAME).await? {
        Some(existing) => existing.id,
        None => {
            let founded = NaiveDate::from_ymd_opt(2020, 1, 15).context("founding date")?;

            repository::association::insert(
                &db,
                &NewAssociation {
                    name: ASSOCIATION_NAME,
                    description: "Uma associação de futebol dedicada a promover o esporte e a \
                                  união entre os membros da comunidade de Porto dos Santos, \
                                  Itaparica, Bahia.",
                    founded_date: founded,
                    address: "Rua Alto do Verão, Porto dos Santos, Itaparica, Bahia",
                    phone: "(71) 99999-9999",
                    email: "contato@portodossantos.com.br",
                    facebook: Some("https://facebook.com/portodossantos"),
                    twitter: Some("https://twitter.com/portodossantos"),
                    instagram: Some("https://instagram.com/portodossantos"),
                    commission: vec!["Mauricio Porto".into(), "Stivie".into(), "Bugari".into()],
                    game_schedule: "Domingos pela manhã",
                    monthly_fee_cents: 5_000,
                },
            )
            .await?
        },
    };
    tracing::info!(association_id, "association ready");

    repository::slug::insert_if_missing(&db, &config.default_slug, association_id).await?;
    tracing::info!(slug = %config.default_slug, "slug ready");

    let admin_password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into());
    let password_hash = hash_password(&admin_password, config.session.bcrypt_cost).await?;

    let admin = NewUser {
        name: "Administrador",
        email: "admin@portodossantos.com",
        cpf: None,
        password_hash: &password_hash,
        role: Role::Committee,
    };
    match repository::user::create(&db, &admin).await? {
        Some(id) => tracing::info!(user_id = id, email = admin.email, "committee account created"),
        None => tracing::info!(email = admin.email, "committee account already exists"),
    }

    let mut added = 0;
    for (cpf, name) in ALLOWED {
        if repository::allowed_user::insert(&db, cpf, name).await? {
            added += 1;
        }
    }
    tracing::info!(added, total = ALLOWED.len(), "allowlist ready");

    Ok(())
}
