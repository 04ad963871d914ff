//! Cached health profile for the signed-in user.
//!
//! DESIGN
//! ======
//! Same shape as the session store: a `watch` channel for state and a liveness
//! flag gating writes. A 401 means "no profile yet", not an error; only
//! unexpected statuses surface in `error`.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::net::api::{ApiError, ProfileApi};
use crate::net::types::{HealthProfile, ProfilePatch};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub profile: Option<HealthProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

struct ProfileInner<A> {
    api: A,
    state: watch::Sender<ProfileState>,
    alive: AtomicBool,
}

pub struct ProfileStore<A> {
    inner: Arc<ProfileInner<A>>,
}

impl<A> Clone for ProfileStore<A> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<A: ProfileApi> ProfileStore<A> {
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(ProfileState::default());
        Self { inner: Arc::new(ProfileInner { api, state, alive: AtomicBool::new(true) }) }
    }

    #[must_use]
    pub fn state(&self) -> ProfileState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.inner.state.subscribe()
    }

    pub async fn init(&self) {
        self.refresh().await;
    }

    pub async fn refresh(&self) {
        self.apply(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.inner.api.fetch_profile().await;
        self.apply(move |s| {
            match result {
                Ok(profile) => s.profile = profile,
                Err(ApiError::Unauthorized) => s.profile = None,
                Err(err @ ApiError::Status { .. }) => s.error = Some(err.to_string()),
                Err(err) => {
                    log::warn!("profile fetch failed: {err}");
                    s.profile = None;
                }
            }
            s.loading = false;
        });
    }

    /// Merge the patch into the cached profile without a network call.
    pub fn update_local(&self, patch: &ProfilePatch) {
        self.apply(|s| s.profile.get_or_insert_with(HealthProfile::default).merge(patch));
    }

    /// Persist the cached profile with `patch` applied and adopt the server's copy.
    ///
    /// # Errors
    ///
    /// Returns the API error; its message is also recorded in `error`.
    pub async fn save(&self, patch: &ProfilePatch) -> Result<HealthProfile, ApiError> {
        let mut merged = self.state().profile.unwrap_or_default();
        merged.merge(patch);
        self.apply(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.inner.api.save_profile(&merged).await {
            Ok(saved) => {
                let stored = saved.clone();
                self.apply(move |s| {
                    s.profile = Some(stored);
                    s.loading = false;
                });
                Ok(saved)
            }
            Err(err) => {
                let message = err.to_string();
                self.apply(move |s| {
                    s.error = Some(message);
                    s.loading = false;
                });
                Err(err)
            }
        }
    }

    pub fn dispose(&self) {
        self.inner.alive.store(false, Ordering::Release);
    }

    fn apply(&self, update: impl FnOnce(&mut ProfileState)) -> bool {
        if !self.inner.alive.load(Ordering::Acquire) {
            return false;
        }
        self.inner.state.send_modify(update);
        true
    }
}
