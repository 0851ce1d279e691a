use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde_json::json;

use crate::{
    dto::auth::{
        AuthErrorQuery, LoginPageQuery, LoginRequest, RegisterPageQuery, RegisterRequest, VerifyCpf,
    },
    error::{AppError, HtmlError},
    routes::guard::{clear_session_cookie, current_session, session_cookie},
    state::AppState,
    usecases::{
        auth::{self, Authenticated},
        registration,
        session::{self, Session},
    },
    utils::safe_callback,
    views,
};

fn issue_session(state: &AppState, who: &Authenticated) -> Result<(Session, String), AppError> {
    let config = &state.config.session;
    let claims = Session::for_user(
        &who.user,
        who.player_id,
        Utc::now().timestamp(),
        config.ttl_secs,
    );

    let token = session::sign(&claims, &config.secret)
        .ok_or_else(|| anyhow::anyhow!("could not sign session token"))?;

    Ok((claims, session_cookie(&token, config)))
}

fn render_login(
    status: StatusCode,
    callback_url: &str,
    login: Option<&str>,
    error: Option<&str>,
    notice: Option<&str>,
) -> Response {
    let page = views::auth::login(&views::auth::LoginPage {
        callback_url,
        login,
        error,
        notice,
    });

    (status, Html(page)).into_response()
}

pub async fn get_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginPageQuery>,
) -> Response {
    let callback = safe_callback(query.callback_url.as_deref());

    if current_session(&state.config.session, &jar).is_some() {
        return Redirect::to(&callback).into_response();
    }

    let error = query.error.as_deref().map(|code| match code {
        "CredentialsSignin" => "CPF ou senha inválidos.",
        "SessionExpired" => "Sua sessão expirou. Entre novamente.",
        _ => "Não foi possível entrar.",
    });
    let notice = query
        .registered
        .is_some()
        .then_some("Cadastro realizado! Faça login para continuar.");

    render_login(StatusCode::OK, &callback, None, error, notice)
}

/// Login form with the CPF already filled in.
pub async fn get_login_with_cpf(Path(cpf): Path<String>) -> Response {
    render_login(StatusCode::OK, "/dashboard", Some(&cpf), None, None)
}

pub async fn post_login(
    State(state): State<AppState>,
    Form(request): Form<LoginRequest>,
) -> Result<Response, HtmlError> {
    let callback = safe_callback(request.callback_url.as_deref());

    let who = match auth::login(state.accounts.as_ref(), &request).await {
        Ok(who) => who,
        Err(e @ AppError::Internal(_)) => return Err(e.into()),
        Err(e) => {
            let _ = state.metrics.incr("auth.login", ["status:rejected"]);

            return Ok(render_login(
                e.status(),
                &callback,
                request.identifier(),
                Some(&e.to_string()),
                None,
            ));
        },
    };

    let (claims, cookie) = issue_session(&state, &who)?;
    let _ = state.metrics.incr("auth.login", ["status:ok"]);

    tracing::info!(user_id = claims.sub, role = claims.role.as_str(), "signed in");

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(&callback)).into_response())
}

pub async fn post_logout() -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}

pub async fn get_register(Query(query): Query<RegisterPageQuery>) -> Html<String> {
    Html(views::auth::register(&views::auth::RegisterPage {
        slug: query.slug.as_deref().unwrap_or_default(),
        ..Default::default()
    }))
}

pub async fn post_register(
    State(state): State<AppState>,
    Form(request): Form<RegisterRequest>,
) -> Result<Response, HtmlError> {
    match registration::register(&state.db, &request, state.config.session.bcrypt_cost).await {
        Ok(_) => {
            let _ = state.metrics.incr("auth.register", ["status:ok"]);
            Ok(Redirect::to("/login?registered=1").into_response())
        },
        Err(e @ AppError::Internal(_)) => Err(e.into()),
        Err(e) => {
            let _ = state.metrics.incr("auth.register", ["status:rejected"]);

            let page = views::auth::register(&views::auth::RegisterPage {
                name: request.name.as_deref().unwrap_or_default(),
                email: request.email.as_deref().unwrap_or_default(),
                cpf: request.cpf.as_deref().unwrap_or_default(),
                slug: request.slug.as_deref().unwrap_or_default(),
                error: Some(&e.to_string()),
            });

            Ok((e.status(), Html(page)).into_response())
        },
    }
}

pub async fn get_auth_error(Query(query): Query<AuthErrorQuery>) -> Html<String> {
    Html(views::auth::auth_error(query.error.as_deref()))
}

/// Registration scoped to an association: the slug is mandatory here.
pub async fn api_register_with_slug(
    state: State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    if request.slug.as_deref().is_none_or(|s| s.trim().is_empty()) {
        return Err(AppError::validation("Todos os campos são obrigatórios"));
    }

    api_register(state, Json(request)).await
}

pub async fn api_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let result =
        registration::register(&state.db, &request, state.config.session.bcrypt_cost).await;

    let status = if result.is_ok() { "status:ok" } else { "status:rejected" };
    let _ = state.metrics.incr("auth.register", [status]);

    let user_id = result?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Usuário criado com sucesso",
            "userId": user_id,
        })),
    )
        .into_response())
}

pub async fn api_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let who = auth::login(state.accounts.as_ref(), &request).await?;
    let (claims, cookie) = issue_session(&state, &who)?;

    let _ = state.metrics.incr("auth.login", ["status:ok"]);

    Ok(([(header::SET_COOKIE, cookie)], Json(claims)).into_response())
}

pub async fn api_verify_cpf(
    State(state): State<AppState>,
    Json(request): Json<VerifyCpf>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth::verify_cpf(&state.db, &request.cpf).await?;

    Ok(Json(json!({ "success": true })))
}

pub async fn api_session(Extension(session): Extension<Session>) -> Json<Session> {
    Json(session)
}
