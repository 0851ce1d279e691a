use std::{sync::Arc, time::Duration};

use anyhow::Result;
use sqlx::{MySql, Pool, mysql::MySqlPoolOptions};

use crate::config::DatabaseConfig;

pub type DbPool = Pool<MySql>;
pub type DbPoolManager = Arc<DbPool>;

fn pool_options(config: &DatabaseConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(Duration::from_secs(30 * 60)) // 30 minutes
        .idle_timeout(Duration::from_secs(10 * 60)) // 10 minutes
        .acquire_timeout(Duration::from_secs(5))
        .test_before_acquire(true)
        .after_connect(|conn, _| {
            Box::pin(async move {
                // once per connection, not per query
                sqlx::query(
                    "set time_zone='+00:00',
                     names utf8mb4 collate utf8mb4_unicode_ci",
                )
                .execute(conn)
                .await?;

                Ok(())
            })
        })
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPoolManager> {
    let pool = pool_options(config).connect(&config.url()).await?;

    Ok(Arc::new(pool))
}

/// A pool that only connects on first use.
pub fn create_lazy_pool(config: &DatabaseConfig) -> Result<DbPoolManager> {
    let pool = pool_options(config)
        .min_connections(0)
        .connect_lazy(&config.url())?;

    Ok(Arc::new(pool))
}

pub async fn run_migrations(db: &DbPoolManager) -> Result<()> {
    sqlx::migrate!("./migrations").run(db.as_ref()).await?;

    Ok(())
}
