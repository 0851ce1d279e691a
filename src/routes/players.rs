use axum::{
    Extension, Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    dto::player::{NewPlayerForm, PlayerQuery},
    error::{AppError, PageResult},
    repository::{
        self,
        player::{CreatePlayerOutcome, NewPlayer},
    },
    state::AppState,
    usecases::{password::hash_password, session::Session},
    utils::local_today,
    views,
};

pub async fn get_players(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<PlayerQuery>,
) -> PageResult<Html<String>> {
    let players = repository::player::fetch_listing(&state.db, query.q.as_deref()).await?;

    Ok(Html(views::players::list(
        &session,
        &players,
        query.q.as_deref(),
    )))
}

pub async fn get_new_player(Extension(session): Extension<Session>) -> Html<String> {
    Html(views::players::new_form(
        &session,
        &NewPlayerForm::default(),
        None,
    ))
}

async fn create_player(state: &AppState, form: &NewPlayerForm) -> Result<u64, AppError> {
    let draft = form.validate(local_today(state.config.utc_offset_hours))?;
    let password_hash = hash_password(&draft.password, state.config.session.bcrypt_cost).await?;

    let outcome = repository::player::create_with_user(
        &state.db,
        &NewPlayer {
            full_name: &draft.full_name,
            nickname: &draft.nickname,
            position: draft.position,
            shirt_number: draft.shirt_number,
            birth_date: draft.birth_date,
            phone: &draft.phone,
            address: &draft.address,
            email: &draft.email,
            cpf: &draft.cpf,
            password_hash: &password_hash,
        },
    )
    .await?;

    match outcome {
        CreatePlayerOutcome::Created { player_id, .. } => Ok(player_id),
        CreatePlayerOutcome::Duplicate => Err(AppError::Conflict(
            "Já existe um usuário com este email ou CPF".into(),
        )),
    }
}

pub async fn post_new_player(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(form): Form<NewPlayerForm>,
) -> PageResult<Response> {
    match create_player(&state, &form).await {
        Ok(player_id) => {
            tracing::info!(player_id, by = session.sub, "player created");
            Ok(Redirect::to("/players").into_response())
        },
        Err(e @ AppError::Internal(_)) => Err(e.into()),
        Err(e) => {
            let status = e.status();
            let page = views::players::new_form(&session, &form, Some(&e.to_string()));

            Ok((status, Html(page)).into_response())
        },
    }
}
