use axum::{
    extract::{Path, State},
    response::Html,
};
use axum_extra::extract::CookieJar;

use crate::{
    error::{AppError, PageResult},
    repository,
    routes::guard::current_session,
    state::AppState,
    views,
};

async fn render_slug(state: &AppState, jar: &CookieJar, slug: &str) -> PageResult<Html<String>> {
    let Some(profile) = repository::slug::fetch_profile(&state.db, slug).await? else {
        return Err(AppError::NotFound("Associação não encontrada".into()).into());
    };

    let session = current_session(&state.config.session, jar);

    Ok(Html(views::landing::render(&profile, session.as_ref())))
}

pub async fn get_home(State(state): State<AppState>, jar: CookieJar) -> PageResult<Html<String>> {
    render_slug(&state, &jar, &state.config.default_slug).await
}

pub async fn get_by_slug(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(slug): Path<String>,
) -> PageResult<Html<String>> {
    render_slug(&state, &jar, &slug).await
}
