//! Wire DTOs for the identity API.
//!
//! DESIGN
//! ======
//! Request bodies use the camelCase keys the API expects; user and profile
//! payloads are lenient (`#[serde(default)]`) so older or partial server
//! responses still decode.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Authenticated user as returned by `GET /api/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier; numeric ids are accepted and kept as strings.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// First name when known, otherwise the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.email.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Extended per-user health profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthProfile {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
}

impl HealthProfile {
    /// Overwrite the fields the patch carries; leave the rest untouched.
    pub fn merge(&mut self, patch: &ProfilePatch) {
        if let Some(age) = patch.age {
            self.age = Some(age);
        }
        if let Some(gender) = &patch.gender {
            self.gender = Some(gender.clone());
        }
        if let Some(allergies) = &patch.allergies {
            self.allergies = Some(allergies.clone());
        }
    }
}

/// Partial profile update. `None` means "leave as is".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub profile: Option<HealthProfile>,
}

/// `{ "error": "..." }` body returned by the API on failure.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        _ => Err(D::Error::custom("expected string or number id")),
    }
}
