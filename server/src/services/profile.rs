//! Health profile storage (age, gender, allergies), one row per user.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub const MAX_AGE: i32 = 130;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthProfile {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub allergies: Option<String>,
}

/// Raw `PUT /api/profile` body. `age` stays untyped so that strings and
/// out-of-range numbers produce "Invalid age" rather than a parse rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Invalid age")]
    InvalidAge,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Accept whole numbers in `0..=130`, given as a JSON number or numeric string.
pub(crate) fn parse_age(raw: Option<&Value>) -> Result<Option<i32>, ProfileError> {
    let number = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    let number = number.filter(|n| n.is_finite() && n.fract() == 0.0).ok_or(ProfileError::InvalidAge)?;
    if !(0.0..=f64::from(MAX_AGE)).contains(&number) {
        return Err(ProfileError::InvalidAge);
    }
    #[allow(clippy::cast_possible_truncation)]
    let age = number as i32;
    Ok(Some(age))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Validate a profile body into the stored representation.
///
/// # Errors
///
/// Returns `InvalidAge` when `age` is present but not a whole number in range.
pub fn validate_profile(input: ProfileInput) -> Result<HealthProfile, ProfileError> {
    Ok(HealthProfile {
        age: parse_age(input.age.as_ref())?,
        gender: blank_to_none(input.gender),
        allergies: blank_to_none(input.allergies),
    })
}

/// Fetch the profile for `user_id`, if one has been saved.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<HealthProfile>, ProfileError> {
    let row = sqlx::query("SELECT age, gender, allergies FROM health_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| HealthProfile { age: r.get("age"), gender: r.get("gender"), allergies: r.get("allergies") }))
}

/// Insert or replace the profile for `user_id`. Returns the stored profile and
/// whether a new row was created.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: Uuid,
    profile: &HealthProfile,
) -> Result<(HealthProfile, bool), ProfileError> {
    let row = sqlx::query(
        r"INSERT INTO health_profiles (user_id, age, gender, allergies)
          VALUES ($1, $2, $3, $4)
          ON CONFLICT (user_id) DO UPDATE
              SET age = EXCLUDED.age,
                  gender = EXCLUDED.gender,
                  allergies = EXCLUDED.allergies,
                  updated_at = now()
          RETURNING age, gender, allergies, (xmax = 0) AS inserted",
    )
    .bind(user_id)
    .bind(profile.age)
    .bind(&profile.gender)
    .bind(&profile.allergies)
    .fetch_one(pool)
    .await?;

    let stored = HealthProfile { age: row.get("age"), gender: row.get("gender"), allergies: row.get("allergies") };
    Ok((stored, row.get("inserted")))
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
