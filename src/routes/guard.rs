//! Session cookie handling and role-gated route groups.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Uri, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use crate::{
    config::SessionConfig,
    constants::{Permissions, SESSION_COOKIE},
    error::{AppError, HtmlError},
    state::AppState,
    usecases::{
        auth::Accounts,
        session::{self, Session},
    },
    utils::url_encode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Unauthenticated,
    Forbidden,
}

pub fn authorize(session: Option<&Session>, required: Permissions) -> Access {
    match session {
        None => Access::Unauthenticated,
        Some(s) if s.permissions().contains(required) => Access::Granted,
        Some(_) => Access::Forbidden,
    }
}

/// The signed-in member, if the cookie carries a valid unexpired token.
pub fn current_session(config: &SessionConfig, jar: &CookieJar) -> Option<Session> {
    let token = jar.get(SESSION_COOKIE)?;

    session::verify(token.value(), &config.secret, Utc::now().timestamp())
}

/// Drops sessions whose account was deactivated after the token was issued.
pub async fn revalidate<A>(accounts: &A, session: Session) -> anyhow::Result<Option<Session>>
where
    A: Accounts + ?Sized,
{
    Ok(accounts.is_active(session.sub).await?.then_some(session))
}

pub fn session_cookie(token: &str, config: &SessionConfig) -> String {
    let secure = if config.secure_cookie { "; Secure" } else { "" };

    format!(
        "{SESSION_COOKIE}={token}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax{secure}",
        config.ttl_secs
    )
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

fn deny(access: Access, uri: &Uri) -> Response {
    let forbidden = access == Access::Forbidden;

    if uri.path().starts_with("/api/") {
        let err = if forbidden {
            AppError::Forbidden("Acesso negado".into())
        } else {
            AppError::Unauthorized("Não autenticado".into())
        };

        return err.into_response();
    }

    if forbidden {
        return Redirect::to("/auth/error?error=AccessDenied").into_response();
    }

    let callback = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    Redirect::to(&format!("/login?callbackUrl={}", url_encode(callback))).into_response()
}

/// State for one protected route group.
#[derive(Clone)]
pub struct Gate {
    state: AppState,
    required: Permissions,
}

impl Gate {
    pub fn new(state: AppState, required: Permissions) -> Self {
        Self { state, required }
    }
}

pub async fn require(
    State(gate): State<Gate>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let mut revoked = None;

    let session = match current_session(&gate.state.config.session, &jar) {
        Some(session) => {
            let user_id = session.sub;

            match revalidate(gate.state.accounts.as_ref(), session).await {
                Ok(Some(session)) => Some(session),
                Ok(None) => {
                    revoked = Some(user_id);
                    None
                },
                Err(e) => {
                    let err = AppError::Internal(e);

                    return if req.uri().path().starts_with("/api/") {
                        err.into_response()
                    } else {
                        HtmlError(err).into_response()
                    };
                },
            }
        },
        None => None,
    };

    match (authorize(session.as_ref(), gate.required), session) {
        (Access::Granted, Some(session)) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        },
        (access, session) => {
            let reason = match access {
                Access::Forbidden => "reason:forbidden",
                _ if revoked.is_some() => "reason:inactive",
                _ => "reason:unauthenticated",
            };
            let _ = gate.state.metrics.incr("auth.denied", [reason]);

            tracing::debug!(
                path = req.uri().path(),
                user_id = session.map(|s| s.sub).or(revoked),
                "access denied"
            );

            let mut res = deny(access, req.uri());
            if revoked.is_some()
                && let Ok(cookie) = HeaderValue::from_str(&clear_session_cookie())
            {
                res.headers_mut().append(header::SET_COOKIE, cookie);
            }

            res
        },
    }
}
