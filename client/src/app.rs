//! Root component: builds the stores, provides them through context, and
//! declares the routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! The stores publish state over `watch` channels. In the browser build each
//! channel is mirrored into an `RwSignal` so components can track it
//! reactively; the stores themselves are also provided for components that
//! need to trigger actions (login, logout, save).
//!
//! Both stores are bootstrapped once when the provider mounts. Pages that need
//! fresher data (settings after a login) call `refresh` themselves.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::config::ClientConfig;
use crate::net::api::HttpApi;
use crate::pages::dashboard::DashboardPage;
use crate::pages::login::LoginPage;
use crate::pages::settings::SettingsPage;
use crate::state::auth::SessionStore;
use crate::state::profile::ProfileStore;
use crate::util::navigation::BrowserNavigator;

pub type AppSession = SessionStore<HttpApi>;
pub type AppProfile = ProfileStore<HttpApi>;

fn build_api(config: &ClientConfig) -> HttpApi {
    match HttpApi::new(config) {
        Ok(api) => api,
        Err(err) => {
            log::error!("http client setup failed, using defaults: {err}");
            HttpApi::with_client(reqwest::Client::new(), &config.api_base)
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_env();
    let api = build_api(&config);
    let session = SessionStore::with_login_path(api.clone(), Arc::new(BrowserNavigator), &config.login_path);
    let profile = ProfileStore::new(api);

    let session_state = RwSignal::new(session.state());
    let profile_state = RwSignal::new(profile.state());
    provide_context(session.clone());
    provide_context(profile.clone());
    provide_context(session_state);
    provide_context(profile_state);

    #[cfg(feature = "csr")]
    {
        let mut session_rx = session.subscribe();
        leptos::task::spawn_local(async move {
            while session_rx.changed().await.is_ok() {
                let snapshot = session_rx.borrow_and_update().clone();
                if session_state.try_set(snapshot).is_some() {
                    break;
                }
            }
        });

        let mut profile_rx = profile.subscribe();
        leptos::task::spawn_local(async move {
            while profile_rx.changed().await.is_ok() {
                let snapshot = profile_rx.borrow_and_update().clone();
                if profile_state.try_set(snapshot).is_some() {
                    break;
                }
            }
        });

        let boot = session.clone();
        leptos::task::spawn_local(async move { boot.init().await });
        let boot = profile.clone();
        leptos::task::spawn_local(async move { boot.init().await });
    }

    on_cleanup(move || {
        session.dispose();
        profile.dispose();
    });

    view! {
        <Title text="NutriVision"/>
        <Router>
            <main>
                <Routes fallback=|| view! { <p class="not-found">"Page not found."</p> }>
                    <Route path=path!("/login") view=LoginPage/>
                    <Route path=path!("/dashboard") view=DashboardPage/>
                    <Route path=path!("/settings") view=SettingsPage/>
                    <Route path=path!("/") view=DashboardPage/>
                </Routes>
            </main>
        </Router>
    }
}
