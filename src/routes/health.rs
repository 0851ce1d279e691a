use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let database = match sqlx::query("select 1").execute(state.db.as_ref()).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!("health check could not reach the database: {e}");
            "unavailable"
        },
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "database": database,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
