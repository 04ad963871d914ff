//! Dashboard: the authenticated landing route.

use leptos::prelude::*;

use crate::app::AppSession;
use crate::components::require_auth::RequireAuth;
use crate::state::auth::SessionState;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let session_state = expect_context::<RwSignal<SessionState>>();

    let greeting = move || {
        session_state
            .get()
            .user
            .map(|user| format!("Welcome, {}!", user.display_name()))
            .unwrap_or_default()
    };

    let on_logout = move |_| {
        #[cfg(feature = "csr")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move { session.logout().await });
        }
        #[cfg(not(feature = "csr"))]
        let _ = &session;
    };

    view! {
        <RequireAuth>
            <div class="dashboard-page">
                <header class="dashboard-header">
                    <h1>{greeting}</h1>
                    <nav>
                        <a href="/settings">"Settings"</a>
                        <button class="logout-button" type="button" on:click=on_logout.clone()>
                            "Log out"
                        </button>
                    </nav>
                </header>
            </div>
        </RequireAuth>
    }
}
