//! Auth routes: registration, password login, logout, and who-am-I.

use std::time::Duration;

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;

use super::{error_response, internal_error};
use crate::services::account::{self, AccountError, RegisterInput};
use crate::services::token::{SessionClaims, Verified};
use crate::state::AppState;

pub const COOKIE_NAME: &str = "auth_token";

pub(crate) fn session_cookie(token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

pub(crate) fn cleared_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}

fn unauthorized() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Caller identity decoded from the `auth_token` cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub claims: SessionClaims,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(unauthorized());
        }

        let app_state = AppState::from_ref(state);
        match app_state.tokens.verify::<SessionClaims>(token) {
            Verified::Valid(claims) => Ok(Self { claims }),
            Verified::Invalid => Err(unauthorized()),
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

pub(crate) fn account_error_status(err: &AccountError) -> StatusCode {
    match err {
        AccountError::MissingFields
        | AccountError::InvalidEmail
        | AccountError::PasswordTooShort
        | AccountError::MissingCredentials => StatusCode::BAD_REQUEST,
        AccountError::EmailTaken => StatusCode::CONFLICT,
        AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AccountError::Db(_) | AccountError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn account_error_response(err: &AccountError) -> Response {
    let status = account_error_status(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "account operation failed");
        return internal_error();
    }
    error_response(status, &err.to_string())
}

/// `POST /api/auth/register` — create an account. Does not log the user in.
pub async fn register(State(state): State<AppState>, Json(input): Json<RegisterInput>) -> Response {
    match account::register(&state.pool, input).await {
        Ok(user) => (StatusCode::CREATED, Json(json!({ "user": user }))).into_response(),
        Err(e) => account_error_response(&e),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/auth/login` — check credentials, issue the session cookie.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Json(input): Json<LoginInput>) -> Response {
    let user = match account::authenticate(&state.pool, input.email.as_deref(), input.password.as_deref()).await {
        Ok(user) => user,
        Err(e) => return account_error_response(&e),
    };

    let claims = SessionClaims { sub: user.id, email: user.email.clone() };
    let token = match state.tokens.sign(&claims) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "session token signing failed");
            return internal_error();
        }
    };

    tracing::info!(user_id = %user.id, "user logged in");
    let jar = jar.add(session_cookie(token, state.tokens.ttl(), state.cookie_secure));
    let body = json!({
        "message": "Logged in",
        "user": {
            "id": user.id,
            "email": user.email,
            "firstName": user.first_name,
            "lastName": user.last_name,
        },
    });
    (jar, Json(body)).into_response()
}

/// `POST /api/auth/logout` — clear the session cookie. Needs no valid session.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(cleared_cookie(state.cookie_secure));
    (jar, Json(json!({ "message": "Logged out" })))
}

/// `GET /api/me` — return the current user.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Response {
    match account::find_user(&state.pool, auth.claims.sub).await {
        Ok(Some(user)) => Json(json!({ "user": user })).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            internal_error()
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
