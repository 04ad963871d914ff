//! Client configuration: where the identity API lives and where to send
//! signed-out users.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const API_URL_VAR: &str = "NUTRIVISION_API_URL";
pub const DEFAULT_API_BASE: &str = "http://localhost:3001";
pub const DEFAULT_LOGIN_PATH: &str = "/login";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// API origin without a trailing slash.
    pub api_base: String,
    pub login_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_base: DEFAULT_API_BASE.to_owned(), login_path: DEFAULT_LOGIN_PATH.to_owned() }
    }
}

impl ClientConfig {
    /// Runtime `NUTRIVISION_API_URL` (native only), then the value baked in at
    /// compile time, then the local default.
    #[must_use]
    pub fn from_env() -> Self {
        let runtime = std::env::var(API_URL_VAR).ok();
        Self::default().with_api_base(&resolve_api_base(runtime.as_deref(), option_env!("NUTRIVISION_API_URL")))
    }

    #[must_use]
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim().trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: &str) -> Self {
        self.login_path = path.to_owned();
        self
    }
}

fn resolve_api_base(runtime: Option<&str>, compiled: Option<&str>) -> String {
    runtime
        .into_iter()
        .chain(compiled)
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .to_owned()
}
