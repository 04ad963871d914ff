//! Password hashing with bcrypt.
//!
//! bcrypt is CPU-bound, so async callers go through the `*_blocking` wrappers
//! which run on tokio's blocking pool.

pub const BCRYPT_COST: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password must be a non-empty string")]
    Empty,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Hash a plaintext password.
///
/// # Errors
///
/// Returns an error for an empty password or a bcrypt failure.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    if plain.is_empty() {
        return Err(PasswordError::Empty);
    }
    Ok(bcrypt::hash(plain, BCRYPT_COST)?)
}

/// Check a plaintext password against a stored hash. Any failure is a mismatch.
#[must_use]
pub fn verify_password(plain: &str, hash: &str) -> bool {
    if plain.is_empty() || hash.is_empty() {
        return false;
    }
    bcrypt::verify(plain, hash).unwrap_or(false)
}

pub async fn hash_password_blocking(plain: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&plain)).await?
}

pub async fn verify_password_blocking(plain: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;
