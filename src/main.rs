use std::{sync::Arc, time::Duration};

use anyhow::Result;
use dotenvy::dotenv;
use porto::{
    config::Config,
    infrastructure::{database, datadog, tasks},
    routes::create_routes,
    state::AppState,
    utils::shutdown_signal,
};
use storage::Storage;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    if config.session.secret == "change-me" {
        tracing::warn!("SESSION_SECRET is not set, sessions are signed with the default secret");
    }

    let db_pool = database::create_pool(&config.database).await?;
    if config.database.run_migrations {
        database::run_migrations(&db_pool).await?;
    }

    let metrics = datadog::create_metric(&config.datadog)?;

    let storage = Storage::new(
        config.receipt_path.clone(),
        &config.r2.bucket,
        &config.r2.endpoint(),
        &config.r2.access_key,
        &config.r2.secret_key,
    )
    .await;

    tokio::spawn(tasks::sweep_overdue_monthlies(
        db_pool.clone(),
        Duration::from_secs(config.overdue_sweep_secs),
        config.utc_offset_hours,
    ));

    let state = AppState::new(config.clone(), db_pool, metrics, storage);
    let app = create_routes(&state).with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("porto running on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
