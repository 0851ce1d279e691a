use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::{
    dto::{
        admin::{AllowedUserForm, MonthlyFeeForm, NewUserForm, UserStatusForm},
        flash::FlashQuery,
    },
    error::{ApiResult, AppError, PageResult},
    models::AllowedUser,
    repository::{self, user::NewUser},
    routes::{default_association, redirect_back},
    state::AppState,
    usecases::{cpf, password::hash_password, session::Session},
    utils::{fmt_brl, parse_cents},
    views::{self, admin::AdminPage},
};

const PAGE: &str = "/admin";

pub async fn get_admin(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(flash): Query<FlashQuery>,
) -> PageResult<Html<String>> {
    let (allowed, users) = tokio::try_join!(
        repository::allowed_user::fetch_all(&state.db),
        repository::user::fetch_all(&state.db),
    )?;
    let monthly_fee_cents = default_association(&state)
        .await
        .map(|a| a.monthly_fee_cents)
        .unwrap_or_default();

    let page = AdminPage {
        allowed: &allowed,
        users: &users,
        monthly_fee_cents,
        notice: flash.notice.as_deref(),
        error: flash.error.as_deref(),
    };

    Ok(Html(views::admin::render(&session, &page)))
}

async fn add_allowed_user(state: &AppState, form: &AllowedUserForm) -> Result<String, AppError> {
    let (number, name) = form.validate()?;

    if !repository::allowed_user::insert(&state.db, &number, &name).await? {
        return Err(AppError::Conflict("CPF já autorizado".into()));
    }

    tracing::info!(cpf = %cpf::format(&number), "cpf authorized");

    Ok(format!("CPF {} autorizado", cpf::format(&number)))
}

async fn remove_allowed_user(state: &AppState, raw_cpf: &str) -> Result<String, AppError> {
    let number = cpf::normalize(raw_cpf);

    if !repository::allowed_user::delete_unused(&state.db, &number).await? {
        return Err(AppError::NotFound("CPF não encontrado ou já utilizado".into()));
    }

    Ok(format!("CPF {} removido", cpf::format(&number)))
}

async fn create_user(state: &AppState, form: &NewUserForm) -> Result<u64, AppError> {
    let draft = form.validate()?;
    let password_hash = hash_password(&draft.password, state.config.session.bcrypt_cost).await?;

    let user = NewUser {
        name: &draft.name,
        email: &draft.email,
        cpf: draft.cpf.as_deref(),
        password_hash: &password_hash,
        role: draft.role,
    };

    let id = repository::user::create(&state.db, &user)
        .await?
        .ok_or_else(|| AppError::Conflict("Usuário já existe com este email".into()))?;

    tracing::info!(user_id = id, role = draft.role.as_str(), "user created by committee");

    Ok(id)
}

async fn set_user_status(
    state: &AppState,
    session: &Session,
    id: u64,
    is_active: bool,
) -> Result<String, AppError> {
    if id == session.sub && !is_active {
        return Err(AppError::validation("Você não pode desativar a própria conta"));
    }

    if !repository::user::set_active(&state.db, id, is_active).await? {
        return Err(AppError::NotFound("Usuário não encontrado".into()));
    }

    Ok("Status do usuário atualizado".to_string())
}

async fn set_monthly_fee(state: &AppState, form: &MonthlyFeeForm) -> Result<String, AppError> {
    let amount_cents = parse_cents(&form.amount).ok_or_else(|| AppError::validation("Valor inválido"))?;
    let association = default_association(state).await?;

    repository::association::set_monthly_fee(&state.db, association.id, amount_cents).await?;

    Ok(format!("Mensalidade padrão alterada para {}", fmt_brl(amount_cents)))
}

pub async fn post_allowed_user(
    State(state): State<AppState>,
    Form(form): Form<AllowedUserForm>,
) -> Response {
    redirect_back(PAGE, add_allowed_user(&state, &form).await)
}

pub async fn post_delete_allowed_user(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Response {
    redirect_back(PAGE, remove_allowed_user(&state, &cpf).await)
}

pub async fn post_user(State(state): State<AppState>, Form(form): Form<NewUserForm>) -> Response {
    let outcome = create_user(&state, &form)
        .await
        .map(|_| "Usuário criado com sucesso".to_string());

    redirect_back(PAGE, outcome)
}

pub async fn post_user_status(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<u64>,
    Form(form): Form<UserStatusForm>,
) -> Response {
    redirect_back(PAGE, set_user_status(&state, &session, id, form.is_active).await)
}

pub async fn post_monthly_fee(
    State(state): State<AppState>,
    Form(form): Form<MonthlyFeeForm>,
) -> Response {
    redirect_back(PAGE, set_monthly_fee(&state, &form).await)
}

pub async fn api_list_allowed_users(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AllowedUser>>> {
    Ok(Json(repository::allowed_user::fetch_all(&state.db).await?))
}

pub async fn api_add_allowed_user(
    State(state): State<AppState>,
    Json(form): Json<AllowedUserForm>,
) -> ApiResult<Response> {
    let message = add_allowed_user(&state, &form).await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": message }))).into_response())
}

pub async fn api_delete_allowed_user(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let message = remove_allowed_user(&state, &cpf).await?;

    Ok(Json(json!({ "message": message })))
}

pub async fn api_create_user(
    State(state): State<AppState>,
    Json(form): Json<NewUserForm>,
) -> ApiResult<Response> {
    let id = create_user(&state, &form).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Usuário criado com sucesso", "userId": id })),
    )
        .into_response())
}

pub async fn api_user_status(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<u64>,
    Json(form): Json<UserStatusForm>,
) -> ApiResult<Json<serde_json::Value>> {
    let message = set_user_status(&state, &session, id, form.is_active).await?;

    Ok(Json(json!({ "message": message })))
}
