use axum::{Extension, Json, extract::State, response::Html};
use serde_json::json;

use crate::{
    error::{ApiResult, PageResult},
    state::AppState,
    usecases::{
        dashboard::{self, DashboardSummary, PlayerOverview},
        session::Session,
    },
    utils::local_today,
    views,
};

async fn load(
    state: &AppState,
    session: &Session,
) -> anyhow::Result<(DashboardSummary, Option<PlayerOverview>)> {
    let today = local_today(state.config.utc_offset_hours);

    let summary = dashboard::load_summary(&state.db, today).await?;
    let overview = match session.player_id {
        Some(player_id) => Some(dashboard::load_player_overview(&state.db, player_id).await?),
        None => None,
    };

    Ok((summary, overview))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> PageResult<Html<String>> {
    let (summary, overview) = load(&state, &session).await?;

    Ok(Html(views::dashboard::render(
        &session,
        &summary,
        overview.as_ref(),
    )))
}

pub async fn get_dashboard_json(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<serde_json::Value>> {
    let (summary, overview) = load(&state, &session).await?;

    Ok(Json(json!({
        "summary": summary,
        "player": overview,
    })))
}
