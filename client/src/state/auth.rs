//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. The store is the only writer of
//! `SessionState`; everything else reads snapshots or subscribes.
//!
//! DESIGN
//! ======
//! State is published through a `watch` channel so UI layers can mirror it into
//! signals and native callers can await changes. A liveness flag gates every
//! write: once `dispose` runs, late results from in-flight requests are dropped
//! and no navigation happens. Overlapping calls are not coalesced; each result
//! applies in the order it resolves.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::config::DEFAULT_LOGIN_PATH;
use crate::net::api::{ApiError, AuthApi};
use crate::net::types::{LoginRequest, RegisterRequest, User};
use crate::util::navigation::Navigator;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub loading: bool,
    /// Set once the first who-am-I check resolves; never cleared.
    pub initialized: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Checking,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Loading, or not yet checked at all.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading || !self.initialized
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match (self.initialized, self.loading, self.user.is_some()) {
            (false, false, _) => SessionPhase::Uninitialized,
            (_, true, _) => SessionPhase::Checking,
            (true, false, true) => SessionPhase::Authenticated,
            (true, false, false) => SessionPhase::Unauthenticated,
        }
    }
}

struct SessionInner<A> {
    api: A,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    state: watch::Sender<SessionState>,
    alive: AtomicBool,
}

/// Session store handle. Clones share one underlying store.
pub struct SessionStore<A> {
    inner: Arc<SessionInner<A>>,
}

impl<A> Clone for SessionStore<A> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<A: AuthApi> SessionStore<A> {
    pub fn new(api: A, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_login_path(api, navigator, DEFAULT_LOGIN_PATH)
    }

    pub fn with_login_path(api: A, navigator: Arc<dyn Navigator>, login_path: &str) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            inner: Arc::new(SessionInner {
                api,
                navigator,
                login_path: login_path.to_owned(),
                state,
                alive: AtomicBool::new(true),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    /// Start the store's lifetime with the first who-am-I check.
    pub async fn init(&self) {
        self.check_session().await;
    }

    pub async fn refresh(&self) {
        self.check_session().await;
    }

    /// # Errors
    ///
    /// Returns the server's message (or "Login failed") when the credentials
    /// are rejected, or the transport error. `user` is left unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.apply(|s| s.loading = true);
        let request = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        match self.inner.api.login(&request).await {
            Ok(()) => {
                self.check_session().await;
                Ok(())
            }
            Err(err) => {
                self.apply(|s| s.loading = false);
                Err(err)
            }
        }
    }

    /// Register, then log in with the same credentials.
    ///
    /// # Errors
    ///
    /// Returns the registration error without touching state, or the login error.
    pub async fn register(&self, request: RegisterRequest) -> Result<(), ApiError> {
        self.inner.api.register(&request).await?;
        self.login(&request.email, &request.password).await
    }

    /// Best-effort server logout, then local sign-out and a trip to the login page.
    pub async fn logout(&self) {
        if let Err(err) = self.inner.api.logout().await {
            log::warn!("logout request failed: {err}");
        }
        if self.apply(|s| s.user = None) {
            self.inner.navigator.navigate(&self.inner.login_path);
        }
    }

    /// End the store's lifetime. Later writes and navigations are dropped.
    pub fn dispose(&self) {
        self.inner.alive.store(false, Ordering::Release);
    }

    async fn check_session(&self) {
        self.apply(|s| s.loading = true);
        let user = match self.inner.api.fetch_me().await {
            Ok(user) => user,
            Err(err) => {
                log::warn!("session check failed: {err}");
                None
            }
        };
        self.apply(move |s| {
            s.user = user;
            s.loading = false;
            s.initialized = true;
        });
    }

    fn apply(&self, update: impl FnOnce(&mut SessionState)) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.inner.state.send_modify(update);
        true
    }
}
