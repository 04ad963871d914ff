//! Route wrapper that gates its children on the session.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::auth::SessionState;
use crate::util::auth::{DEFAULT_REDIRECT_TO, GuardConfig, GuardDecision, RouteGuard, decide};

/// Render `children` only for a signed-in user when `require_auth` is set.
/// Signed-out visitors are sent once to `redirect_to` with the current
/// location as the `redirect` query parameter.
#[component]
pub fn RequireAuth(
    children: ChildrenFn,
    #[prop(optional, into)] redirect_to: Option<String>,
    #[prop(default = true)] require_auth: bool,
) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let navigate = use_navigate();
    let location = use_location();

    let mut guard = RouteGuard::new(GuardConfig {
        redirect_to: redirect_to.unwrap_or_else(|| DEFAULT_REDIRECT_TO.to_owned()),
        require_auth,
    });
    Effect::new(move || {
        let state = session.get();
        let here = format!("{}{}", location.pathname.get_untracked(), location.search.get_untracked());
        if let Some(target) = guard.observe(&state, &here).redirect {
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    move || match decide(&session.get(), require_auth) {
        GuardDecision::RenderLoading => view! { <div class="auth-loading">"Loading..."</div> }.into_any(),
        GuardDecision::Redirect => ().into_any(),
        GuardDecision::RenderChildren => children().into_any(),
    }
}
