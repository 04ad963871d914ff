//! Health profile routes. Both require a session.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use super::auth::AuthUser;
use super::{error_response, internal_error};
use crate::services::profile::{self, ProfileError, ProfileInput};
use crate::state::AppState;

fn profile_error_response(err: &ProfileError) -> Response {
    match err {
        ProfileError::InvalidAge => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
        ProfileError::Db(e) => {
            tracing::error!(error = %e, "profile query failed");
            internal_error()
        }
    }
}

/// `GET /api/profile` — `{ profile }`, where `profile` is null until first saved.
pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> Response {
    match profile::get_profile(&state.pool, auth.claims.sub).await {
        Ok(found) => Json(json!({ "profile": found })).into_response(),
        Err(e) => profile_error_response(&e),
    }
}

/// `PUT /api/profile` — create (201) or replace (200) the caller's profile.
pub async fn put_profile(State(state): State<AppState>, auth: AuthUser, Json(input): Json<ProfileInput>) -> Response {
    let validated = match profile::validate_profile(input) {
        Ok(p) => p,
        Err(e) => return profile_error_response(&e),
    };

    match profile::upsert_profile(&state.pool, auth.claims.sub, &validated).await {
        Ok((stored, inserted)) => {
            let status = if inserted { StatusCode::CREATED } else { StatusCode::OK };
            tracing::debug!(user_id = %auth.claims.sub, inserted, "profile saved");
            (status, Json(json!({ "profile": stored }))).into_response()
        }
        Err(e) => profile_error_response(&e),
    }
}
