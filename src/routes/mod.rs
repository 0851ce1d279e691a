pub mod admin;
pub mod association;
pub mod auth;
pub mod dashboard;
pub mod financial;
pub mod guard;
pub mod health;
pub mod players;
pub mod receipts;
pub mod reports;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, patch, post},
};

use crate::{
    constants::{MAX_RECEIPT_SIZE, Permissions},
    error::{AppError, HtmlError},
    models::Association,
    repository,
    routes::guard::Gate,
    state::AppState,
    utils::url_encode,
};

/// Back to `page` after a form post, with the outcome in the query string.
pub(crate) fn redirect_back(page: &str, outcome: Result<String, AppError>) -> Response {
    match outcome {
        Ok(notice) => Redirect::to(&format!("{page}?notice={}", url_encode(&notice))).into_response(),
        Err(e @ AppError::Internal(_)) => HtmlError(e).into_response(),
        Err(e) => Redirect::to(&format!("{page}?error={}", url_encode(&e.to_string()))).into_response(),
    }
}

/// The association served at the default slug; owns the dues settings.
pub(crate) async fn default_association(state: &AppState) -> Result<Association, AppError> {
    repository::association::fetch_by_slug(&state.db, &state.config.default_slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Associação não encontrada".into()))
}

fn gated(router: Router<AppState>, state: &AppState, required: Permissions) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        Gate::new(state.clone(), required),
        guard::require,
    ))
}

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(association::get_home))
        .route("/health", get(health::health))
        .route("/login", get(auth::get_login).post(auth::post_login))
        .route("/login/{cpf}", get(auth::get_login_with_cpf))
        .route("/logout", post(auth::post_logout))
        .route("/register", get(auth::get_register).post(auth::post_register))
        .route("/auth/error", get(auth::get_auth_error))
        .route("/auth/register", post(auth::api_register_with_slug))
        .route("/api/auth/register", post(auth::api_register))
        .route("/api/auth/login", post(auth::api_login))
        .route("/api/auth/verify-cpf", post(auth::api_verify_cpf))
        .route("/{slug}", get(association::get_by_slug));

    let members = Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/players", get(players::get_players))
        .route("/financial", get(financial::get_financial))
        .route("/reports", get(reports::get_reports))
        .route("/receipts/{file}", get(receipts::get_receipt))
        .route("/api/dashboard", get(dashboard::get_dashboard_json))
        .route("/api/reports/monthly", get(reports::get_monthly_json))
        .route("/api/reports/annual", get(reports::get_annual_json))
        .route("/api/auth/session", get(auth::api_session));

    let roster = Router::new().route(
        "/players/new",
        get(players::get_new_player).post(players::post_new_player),
    );

    let finances = Router::new()
        .route(
            "/financial/transactions",
            post(financial::post_transaction)
                .layer(DefaultBodyLimit::max(MAX_RECEIPT_SIZE + 64 * 1024)),
        )
        .route("/financial/monthlies", post(financial::post_monthly))
        .route(
            "/financial/monthlies/generate",
            post(financial::post_generate_monthlies),
        )
        .route(
            "/financial/monthlies/{id}/status",
            post(financial::post_monthly_status),
        )
        .route("/financial/cards", post(financial::post_card))
        .route("/financial/cards/{id}/pay", post(financial::post_pay_card));

    let access = Router::new()
        .route("/admin", get(admin::get_admin))
        .route("/admin/allowed-users", post(admin::post_allowed_user))
        .route(
            "/admin/allowed-users/{cpf}/delete",
            post(admin::post_delete_allowed_user),
        )
        .route("/admin/users", post(admin::post_user))
        .route("/admin/users/{id}/status", post(admin::post_user_status))
        .route("/admin/monthly-fee", post(admin::post_monthly_fee))
        .route(
            "/api/admin/allowed-users",
            get(admin::api_list_allowed_users).post(admin::api_add_allowed_user),
        )
        .route(
            "/api/admin/allowed-users/{cpf}",
            delete(admin::api_delete_allowed_user),
        )
        .route("/api/admin/users", post(admin::api_create_user))
        .route("/api/admin/users/{id}/status", patch(admin::api_user_status));

    public
        .merge(gated(members, state, Permissions::VIEW))
        .merge(gated(roster, state, Permissions::MANAGE_MEMBERS))
        .merge(gated(finances, state, Permissions::MANAGE_FINANCES))
        .merge(gated(access, state, Permissions::MANAGE_ACCESS))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::Config,
        constants::Role,
        infrastructure::{database, datadog},
        models::User,
        usecases::{
            auth::{Accounts, Identifier},
            session::{self, Session},
        },
    };

    const SECRET: &str = "router-test-secret";

    /// Every account is active except the listed ids.
    struct Roster {
        inactive: Vec<u64>,
    }

    #[async_trait::async_trait]
    impl Accounts for Roster {
        async fn find_user(&self, _identifier: &Identifier) -> anyhow::Result<Option<User>> {
            Ok(None)
        }

        async fn player_id(&self, _user_id: u64) -> anyhow::Result<Option<u64>> {
            Ok(None)
        }

        async fn is_active(&self, user_id: u64) -> anyhow::Result<bool> {
            Ok(!self.inactive.contains(&user_id))
        }
    }

    fn test_state(inactive: &[u64]) -> AppState {
        let mut config = Config::default();
        config.session.secret = SECRET.into();

        // never connects: every request below is answered before a query runs
        let db = database::create_lazy_pool(&config.database).unwrap();
        let metrics = datadog::create_metric(&config.datadog).unwrap();
        let storage = storage::Storage::local(config.receipt_path.clone());

        let mut state = AppState::new(Arc::new(config), db, metrics, storage);
        state.accounts = Arc::new(Roster {
            inactive: inactive.to_vec(),
        });

        state
    }

    fn app_with_inactive(inactive: &[u64]) -> Router {
        let state = test_state(inactive);
        create_routes(&state).with_state(state)
    }

    fn app() -> Router {
        app_with_inactive(&[])
    }

    fn cookie_for(role: Role, exp: i64) -> String {
        let claims = Session {
            sub: 10,
            name: "Teste".into(),
            email: "teste@example.com".into(),
            role,
            player_id: None,
            cpf: None,
            exp,
        };

        format!(
            "{}={}",
            crate::constants::SESSION_COOKIE,
            session::sign(&claims, SECRET).unwrap()
        )
    }

    fn valid_cookie(role: Role) -> String {
        cookie_for(role, Utc::now().timestamp() + 3600)
    }

    async fn get(uri: &str, cookie: Option<&str>) -> axum::response::Response {
        let mut req = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }

        app().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
    }

    fn location(res: &axum::response::Response) -> &str {
        res.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn json_message(res: axum::response::Response) -> String {
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        value["message"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn anonymous_pages_redirect_to_login() {
        let res = get("/dashboard", None).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login?callbackUrl=%2Fdashboard");

        let res = get("/admin", None).await;
        assert_eq!(location(&res), "/login?callbackUrl=%2Fadmin");
    }

    #[tokio::test]
    async fn players_are_turned_away_from_committee_pages() {
        let cookie = valid_cookie(Role::Player);

        for uri in ["/admin", "/players/new"] {
            let res = get(uri, Some(&cookie)).await;

            assert_eq!(res.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(location(&res), "/auth/error?error=AccessDenied", "{uri}");
        }
    }

    #[tokio::test]
    async fn committee_reaches_committee_pages() {
        let res = get("/players/new", Some(&valid_cookie(Role::Committee))).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn api_routes_answer_with_status_codes() {
        let res = get("/api/dashboard", None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = get("/api/admin/allowed-users", Some(&valid_cookie(Role::Player))).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_message(res).await, "Acesso negado");
    }

    #[tokio::test]
    async fn session_endpoint_echoes_claims() {
        let res = get("/api/auth/session", Some(&valid_cookie(Role::Player))).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["role"], "jogador");
        assert_eq!(value["sub"], 10);
    }

    #[tokio::test]
    async fn tampered_and_expired_cookies_are_anonymous() {
        let tampered = valid_cookie(Role::Committee).replace('.', ".00");
        let res = get("/dashboard", Some(&tampered)).await;
        assert_eq!(location(&res), "/login?callbackUrl=%2Fdashboard");

        let expired = cookie_for(Role::Committee, Utc::now().timestamp() - 1);
        let res = get("/api/dashboard", Some(&expired)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let foreign = format!(
            "{}={}",
            crate::constants::SESSION_COOKIE,
            session::sign(
                &Session {
                    sub: 1,
                    name: "x".into(),
                    email: "x@example.com".into(),
                    role: Role::Committee,
                    player_id: None,
                    cpf: None,
                    exp: Utc::now().timestamp() + 3600,
                },
                "another-secret"
            )
            .unwrap()
        );
        let res = get("/admin", Some(&foreign)).await;
        assert_eq!(location(&res), "/login?callbackUrl=%2Fadmin");
    }

    #[tokio::test]
    async fn deactivated_accounts_are_signed_out() {
        // cookie_for signs claims for user 10
        let cookie = valid_cookie(Role::Committee);
        let request = |uri: &str| {
            Request::builder()
                .uri(uri)
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap()
        };

        let res = app_with_inactive(&[10])
            .oneshot(request("/players/new"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login?callbackUrl=%2Fplayers%2Fnew");
        assert!(
            res.headers()[header::SET_COOKIE]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );

        let res = app_with_inactive(&[10])
            .oneshot(request("/api/admin/allowed-users"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app_with_inactive(&[99])
            .oneshot(request("/players/new"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn out_of_range_years_are_rejected() {
        let cookie = valid_cookie(Role::Player);

        let res = get("/api/reports/annual?year=2147483647", Some(&cookie)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_message(res).await, "Ano inválido");

        let res = get("/reports?year=2147483647&month=2025-12", Some(&cookie)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn public_pages_render_without_session() {
        for uri in ["/login", "/register", "/auth/error?error=AccessDenied", "/login/52998224725"] {
            let res = get(uri, None).await;
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn signed_in_login_page_forwards_to_callback() {
        let res = get(
            "/login?callbackUrl=%2Ffinancial",
            Some(&valid_cookie(Role::Player)),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/financial");
    }

    #[tokio::test]
    async fn registration_validates_before_touching_the_database() {
        let post = |body: &'static str| {
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap()
        };

        let res = app()
            .oneshot(post(r#"{"name":"Ana","email":"ana@example.com","password":"segredo"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_message(res).await, "Todos os campos são obrigatórios");

        let res = app()
            .oneshot(post(
                r#"{"name":"Ana","email":"ana@example.com","password":"segredo","cpf":"123.456.789-01"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_message(res).await, "CPF inválido");
    }

    #[tokio::test]
    async fn association_registration_requires_a_slug() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"Ana","email":"ana@example.com","password":"segredo","cpf":"52998224725"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_message(res).await, "Todos os campos são obrigatórios");
    }

    #[tokio::test]
    async fn logout_clears_the_cookie() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(
            res.headers()[header::SET_COOKIE]
                .to_str()
                .unwrap()
                .contains("Max-Age=0")
        );
    }
}
