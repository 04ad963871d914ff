//! Route guard state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! `components::require_auth` feeds every session snapshot through a
//! `RouteGuard` and renders whatever `decide` returns. Keeping the machine
//! free of Leptos types lets the redirect invariants be tested directly.
//!
//! DESIGN
//! ======
//! A store that has not finished its first check counts as loading, so no
//! redirect can fire before the session is known. The redirect latch is the
//! `GuardEpisode`: one redirect per signed-out episode, reopened only when a
//! user appears.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::state::auth::SessionState;

pub const DEFAULT_REDIRECT_TO: &str = "/login";
pub const DEFAULT_RETURN_PATH: &str = "/dashboard";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    RenderChildren,
    RenderLoading,
    /// Signed out on a protected route: render nothing.
    Redirect,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardEpisode {
    #[default]
    Open,
    Redirected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardConfig {
    pub redirect_to: String,
    pub require_auth: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self { redirect_to: DEFAULT_REDIRECT_TO.to_owned(), require_auth: true }
    }
}

/// Outcome of one observation: what to render and, at most once per
/// episode, where to go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardStep {
    pub decision: GuardDecision,
    pub redirect: Option<String>,
}

#[must_use]
pub fn decide(state: &SessionState, require_auth: bool) -> GuardDecision {
    if state.is_loading() {
        GuardDecision::RenderLoading
    } else if require_auth && state.user.is_none() {
        GuardDecision::Redirect
    } else {
        GuardDecision::RenderChildren
    }
}

/// `"{redirect_to}?redirect={location}"` with the location percent-encoded.
#[must_use]
pub fn redirect_url(redirect_to: &str, location: &str) -> String {
    let location = if location.is_empty() { DEFAULT_RETURN_PATH } else { location };
    let encoded: String = url::form_urlencoded::byte_serialize(location.as_bytes()).collect();
    let separator = if redirect_to.contains('?') { '&' } else { '?' };
    format!("{redirect_to}{separator}redirect={encoded}")
}

#[derive(Clone, Debug, Default)]
pub struct RouteGuard {
    config: GuardConfig,
    episode: GuardEpisode,
}

impl RouteGuard {
    #[must_use]
    pub fn new(config: GuardConfig) -> Self {
        Self { config, episode: GuardEpisode::Open }
    }

    #[must_use]
    pub fn episode(&self) -> GuardEpisode {
        self.episode
    }

    pub fn observe(&mut self, state: &SessionState, location: &str) -> GuardStep {
        if state.user.is_some() {
            self.episode = GuardEpisode::Open;
        }

        let decision = decide(state, self.config.require_auth);
        let redirect = if decision == GuardDecision::Redirect && self.episode == GuardEpisode::Open {
            self.episode = GuardEpisode::Redirected;
            Some(redirect_url(&self.config.redirect_to, location))
        } else {
            None
        };

        GuardStep { decision, redirect }
    }
}
