//! REST API client for the identity service.
//!
//! Native builds keep the `auth_token` cookie in reqwest's cookie store; the
//! browser build asks fetch to include credentials so the cookie rides along
//! on cross-origin requests.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. The stores decide which failures
//! are surfaced (foreground actions) and which fail closed (background checks).

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};

use super::types::{ErrorBody, HealthProfile, LoginRequest, MeResponse, ProfileResponse, RegisterRequest, User};
use crate::config::ClientConfig;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Unauthorized")]
    Unauthorized,
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() { Self::Decode(err.to_string()) } else { Self::Transport(err.to_string()) }
    }
}

/// Session endpoints used by the session store.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AuthApi {
    /// `GET /api/me`. `Ok(None)` for any non-success status.
    async fn fetch_me(&self) -> Result<Option<User>, ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<(), ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
}

/// Health profile endpoints used by the profile store.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ProfileApi {
    /// `GET /api/profile`. `Err(Unauthorized)` on 401.
    async fn fetch_profile(&self) -> Result<Option<HealthProfile>, ApiError>;
    /// `PUT /api/profile` with the full profile; returns what the server stored.
    async fn save_profile(&self, profile: &HealthProfile) -> Result<HealthProfile, ApiError>;
}

#[derive(Clone, Debug)]
pub struct HttpApi {
    client: reqwest::Client,
    base: String,
}

impl HttpApi {
    /// # Errors
    ///
    /// Returns `Transport` if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true);
        let client = builder.build()?;
        Ok(Self::with_client(client, &config.api_base))
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base: &str) -> Self {
        Self { client, base: base.trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        include_credentials(self.client.request(method, endpoint_url(&self.base, path)))
    }
}

#[cfg(target_arch = "wasm32")]
fn include_credentials(builder: RequestBuilder) -> RequestBuilder {
    builder.fetch_credentials_include()
}

#[cfg(not(target_arch = "wasm32"))]
fn include_credentials(builder: RequestBuilder) -> RequestBuilder {
    builder
}

fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn failed_status_message(status: u16) -> String {
    format!("Failed ({status})")
}

/// Prefer the server's `{error}` message; fall back when the body is empty or not JSON.
fn pick_error_message(body: Option<ErrorBody>, fallback: &str) -> String {
    body.and_then(|b| b.error)
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

async fn status_error(resp: Response, fallback: &str) -> ApiError {
    let status = resp.status().as_u16();
    let body = resp.json::<ErrorBody>().await.ok();
    ApiError::Status { status, message: pick_error_message(body, fallback) }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthApi for HttpApi {
    async fn fetch_me(&self) -> Result<Option<User>, ApiError> {
        let resp = self.request(Method::GET, "/api/me").send().await?;
        if !resp.status().is_success() {
            log::debug!("session check returned {}", resp.status());
            return Ok(None);
        }
        let body: MeResponse = resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(Some(body.user))
    }

    async fn login(&self, request: &LoginRequest) -> Result<(), ApiError> {
        let resp = self.request(Method::POST, "/api/auth/login").json(request).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp, "Login failed").await);
        }
        Ok(())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let resp = self.request(Method::POST, "/api/auth/register").json(request).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp, "Registration failed").await);
        }
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let resp = self.request(Method::POST, "/api/auth/logout").send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp, "Logout failed").await);
        }
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ProfileApi for HttpApi {
    async fn fetch_profile(&self) -> Result<Option<HealthProfile>, ApiError> {
        let resp = self.request(Method::GET, "/api/profile").send().await?;
        match resp.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status if status.is_success() => {
                let body: ProfileResponse = resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;
                Ok(body.profile)
            }
            status => Err(ApiError::Status { status: status.as_u16(), message: failed_status_message(status.as_u16()) }),
        }
    }

    async fn save_profile(&self, profile: &HealthProfile) -> Result<HealthProfile, ApiError> {
        let resp = self.request(Method::PUT, "/api/profile").json(profile).send().await?;
        match resp.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status if status.is_success() => {
                let body: ProfileResponse = resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;
                body.profile.ok_or_else(|| ApiError::Decode("missing profile in response".to_owned()))
            }
            status => Err(status_error(resp, &failed_status_message(status.as_u16())).await),
        }
    }
}
