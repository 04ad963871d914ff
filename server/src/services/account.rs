//! Email + password accounts: registration, credential checks, lookup.
//!
//! Validation runs before any database access so malformed requests are
//! answered without touching Postgres.

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::password::{self, PasswordError};

pub const MIN_PASSWORD_CHARS: usize = 6;

const USER_COLUMNS: &str = r#"id, first_name, last_name, email,
    to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at"#;

/// Public view of a user row. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: Option<String>,
}

/// Raw registration body; every field is optional so missing fields map to
/// a 400 instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Password too short (min 6 chars)")]
    PasswordTooShort,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Missing credentials")]
    MissingCredentials,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Trim and lower-case an email, requiring `local@domain.tld` with no spaces.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.chars().any(char::is_whitespace) {
        return None;
    }
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.contains('@') {
        return None;
    }
    let (host, tld) = domain.rsplit_once('.')?;
    if host.is_empty() || tld.is_empty() {
        return None;
    }
    Some(normalized)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Check a registration body and normalize its fields.
///
/// # Errors
///
/// Returns `MissingFields`, `InvalidEmail`, or `PasswordTooShort`.
pub fn validate_registration(input: RegisterInput) -> Result<NewAccount, AccountError> {
    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        present(input.first_name),
        present(input.last_name),
        present(input.email),
        present(input.password),
    ) else {
        return Err(AccountError::MissingFields);
    };

    let email = normalize_email(&email).ok_or(AccountError::InvalidEmail)?;
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AccountError::PasswordTooShort);
    }

    Ok(NewAccount { first_name: first_name.trim().to_owned(), last_name: last_name.trim().to_owned(), email, password })
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> AccountUser {
    AccountUser {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }
}

/// Create an account. The password is hashed off the async runtime.
///
/// # Errors
///
/// Returns a validation error, `EmailTaken`, or a database/hash failure.
pub async fn register(pool: &PgPool, input: RegisterInput) -> Result<AccountUser, AccountError> {
    let account = validate_registration(input)?;

    let existing = sqlx::query("SELECT 1 FROM users WHERE email = $1")
        .bind(&account.email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AccountError::EmailTaken);
    }

    let password_hash = password::hash_password_blocking(account.password).await?;
    let row = sqlx::query(&format!(
        "INSERT INTO users (first_name, last_name, email, password_hash)
         VALUES ($1, $2, $3, $4)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&account.first_name)
    .bind(&account.last_name)
    .bind(&account.email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AccountError::EmailTaken,
        other => AccountError::Db(other),
    })?;

    let user = user_from_row(&row);
    tracing::info!(user_id = %user.id, "account registered");
    Ok(user)
}

/// Check an email + password pair and return the matching user.
///
/// # Errors
///
/// Returns `MissingCredentials` for absent fields, `InvalidCredentials` for
/// an unknown email or wrong password, or a database error.
pub async fn authenticate(
    pool: &PgPool,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<AccountUser, AccountError> {
    let (Some(email), Some(password)) = (
        email.filter(|v| !v.trim().is_empty()),
        password.filter(|v| !v.is_empty()),
    ) else {
        return Err(AccountError::MissingCredentials);
    };

    let email = email.trim().to_ascii_lowercase();
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1 LIMIT 1"))
        .bind(&email)
        .fetch_optional(pool)
        .await?
        .ok_or(AccountError::InvalidCredentials)?;

    let hash: String = row.get("password_hash");
    if !password::verify_password_blocking(password.to_owned(), hash).await {
        return Err(AccountError::InvalidCredentials);
    }
    Ok(user_from_row(&row))
}

/// Look up a user by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn find_user(pool: &PgPool, user_id: Uuid) -> Result<Option<AccountUser>, AccountError> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(user_from_row))
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
