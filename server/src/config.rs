//! Identity service configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup builds one `ServerConfig` and hands the pieces to the pool, the
//! token codec, the cookie helpers, and the CORS layer. Parsing goes through a
//! lookup closure so tests never touch the process environment.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_JWT_EXPIRES_IN: &str = "7d";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("JWT_SECRET must be set when APP_ENV is production")]
    MissingSecretInProduction,
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub environment: Environment,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub cors_origins: Vec<String>,
    pub cookie_secure: bool,
    pub db_max_connections: u32,
}

impl ServerConfig {
    /// Build the config from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// Required: `DATABASE_URL`. Optional: `PORT`, `APP_ENV`, `JWT_SECRET`,
    /// `JWT_EXPIRES_IN`, `CORS_ORIGIN`, `COOKIE_SECURE`, `DB_MAX_CONNECTIONS`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing, a value does not
    /// parse, or `JWT_SECRET` is absent in production.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let environment = parse_environment(lookup("APP_ENV").as_deref())?;
        let jwt_secret = resolve_secret(lookup("JWT_SECRET"), environment)?;

        let ttl_raw = lookup("JWT_EXPIRES_IN").unwrap_or_else(|| DEFAULT_JWT_EXPIRES_IN.to_owned());
        let jwt_ttl = parse_ttl(&ttl_raw).ok_or(ConfigError::Invalid { var: "JWT_EXPIRES_IN", value: ttl_raw })?;

        let cors_origins = parse_origins(&lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_owned()));

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { var: "COOKIE_SECURE", value: raw })?,
            None => environment == Environment::Production,
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid { var: "DB_MAX_CONNECTIONS", value: raw })?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        Ok(Self { database_url, port, environment, jwt_secret, jwt_ttl, cors_origins, cookie_secure, db_max_connections })
    }
}

/// Parse a boolean flag: `1/true/yes/on` or `0/false/no/off`, case-insensitive.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a token lifetime such as `7d`, `12h`, `30m`, `45s`, or bare seconds.
pub(crate) fn parse_ttl(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit_secs) = match raw.char_indices().last()? {
        (i, 'd') => (&raw[..i], 86_400),
        (i, 'h') => (&raw[..i], 3_600),
        (i, 'm') => (&raw[..i], 60),
        (i, 's') => (&raw[..i], 1),
        _ => (raw, 1),
    };
    let count = digits.parse::<u64>().ok().filter(|n| *n > 0)?;
    Some(Duration::from_secs(count.checked_mul(unit_secs)?))
}

fn parse_environment(raw: Option<&str>) -> Result<Environment, ConfigError> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("" | "development" | "dev" | "test") => Ok(Environment::Development),
        Some("production" | "prod") => Ok(Environment::Production),
        Some(other) => Err(ConfigError::Invalid { var: "APP_ENV", value: other.to_owned() }),
    }
}

fn resolve_secret(raw: Option<String>, environment: Environment) -> Result<String, ConfigError> {
    if let Some(secret) = raw.filter(|s| !s.trim().is_empty()) {
        return Ok(secret);
    }
    match environment {
        Environment::Production => Err(ConfigError::MissingSecretInProduction),
        Environment::Development => {
            tracing::warn!("JWT_SECRET not set; using the development secret");
            Ok(DEV_JWT_SECRET.to_owned())
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
