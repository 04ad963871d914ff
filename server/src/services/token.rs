//! Session token codec: HS256 JWTs with a fixed time-to-live.
//!
//! DESIGN
//! ======
//! `verify` never returns an error. Bad signatures, malformed input, missing
//! `exp`, and expiry all collapse into `Verified::Invalid`, so callers cannot
//! learn why a token was refused. Expiry is checked against an explicit clock
//! (`verify_at`) with no leeway.
//!
//! Payloads must serialize to JSON objects without their own `iat` or `exp`;
//! the codec owns both claims and refuses to sign anything that would shadow
//! them.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Claims written by the codec itself.
const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// Payload carried by login session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
}

/// Result of verifying a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verified<P> {
    Valid(P),
    Invalid,
}

impl<P> Verified<P> {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    #[must_use]
    pub fn into_option(self) -> Option<P> {
        match self {
            Self::Valid(payload) => Some(payload),
            Self::Invalid => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token encoding failed: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
    #[error("token payload could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("token payload must be a JSON object")]
    NotAnObject,
    #[error("token payload already has an \"{0}\" claim")]
    ReservedClaim(&'static str),
}

#[derive(Deserialize)]
struct Envelope<P> {
    #[serde(flatten)]
    payload: P,
    // Held out of the payload so decoded claims match what was signed.
    #[serde(rename = "iat")]
    _iat: u64,
    exp: u64,
}

/// Signs and verifies session tokens with a server-held secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Lifetime applied to every issued token.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `payload`, issued now.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized into claims.
    pub fn sign<P: Serialize>(&self, payload: &P) -> Result<String, TokenError> {
        self.sign_at(payload, unix_now())
    }

    /// Sign `payload` as if issued at `issued_at` (unix seconds).
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a JSON object, already carries
    /// `iat` or `exp`, or cannot be encoded.
    pub fn sign_at<P: Serialize>(&self, payload: &P, issued_at: u64) -> Result<String, TokenError> {
        let Value::Object(mut claims) = serde_json::to_value(payload)? else {
            return Err(TokenError::NotAnObject);
        };
        if let Some(key) = RESERVED_CLAIMS.into_iter().find(|key| claims.contains_key(*key)) {
            return Err(TokenError::ReservedClaim(key));
        }
        claims.insert("iat".to_owned(), issued_at.into());
        claims.insert("exp".to_owned(), issued_at.saturating_add(self.ttl.as_secs()).into());
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify `token` against the current clock.
    #[must_use]
    pub fn verify<P: DeserializeOwned>(&self, token: &str) -> Verified<P> {
        self.verify_at(token, unix_now())
    }

    /// Verify `token` as if the current time were `now` (unix seconds).
    ///
    /// A token is valid strictly before its `exp`.
    #[must_use]
    pub fn verify_at<P: DeserializeOwned>(&self, token: &str, now: u64) -> Verified<P> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        match decode::<Envelope<P>>(token, &self.decoding, &validation) {
            Ok(data) if data.claims.exp > now => Verified::Valid(data.claims.payload),
            Ok(_) => {
                tracing::debug!("token expired");
                Verified::Invalid
            }
            Err(e) => {
                tracing::debug!(error = %e, "token rejected");
                Verified::Invalid
            }
        }
    }
}

fn unix_now() -> u64 {
    u64::try_from(time::OffsetDateTime::now_utc().unix_timestamp()).unwrap_or(0)
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
