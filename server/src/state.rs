//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the session token codec, and the cookie
//! policy. Clone is required by Axum; every member is cheap to clone.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::token::TokenCodec;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: Arc<TokenCodec>,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, tokens: TokenCodec, cookie_secure: bool) -> Self {
        Self { pool, tokens: Arc::new(tokens), cookie_secure }
    }

    #[must_use]
    pub fn from_config(pool: PgPool, config: &ServerConfig) -> Self {
        Self::new(pool, TokenCodec::new(&config.jwt_secret, config.jwt_ttl), config.cookie_secure)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
