//! Login page with an inline registration form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both forms go through the session store, so a successful registration logs
//! the user in. After sign-in the page returns to the `redirect` query
//! parameter the route guard attached, or the dashboard.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
#[cfg(feature = "csr")]
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::app::AppSession;
use crate::net::types::RegisterRequest;
use crate::util::auth::DEFAULT_RETURN_PATH;

const MIN_PASSWORD_CHARS: usize = 6;

fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

fn validate_register_input(
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<RegisterRequest, &'static str> {
    let (first_name, last_name, email) = (first_name.trim(), last_name.trim(), email.trim());
    if first_name.is_empty() || last_name.is_empty() || email.is_empty() || password.is_empty() {
        return Err("All fields are required.");
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err("Password must be at least 6 characters.");
    }
    Ok(RegisterRequest {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
    })
}

/// Only same-site absolute paths are honored; anything else goes to the dashboard.
fn return_target(redirect: Option<&str>) -> String {
    match redirect.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_owned(),
        _ => DEFAULT_RETURN_PATH.to_owned(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let query = use_query_map();
    let navigate = use_navigate();

    let registering = RwSignal::new(false);
    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let target = return_target(query.get_untracked().get("redirect").as_deref());

        if registering.get() {
            let request = match validate_register_input(&first_name.get(), &last_name.get(), &email.get(), &password.get()) {
                Ok(request) => request,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };
            busy.set(true);
            info.set("Creating account...".to_owned());

            #[cfg(feature = "csr")]
            {
                let session = session.clone();
                let navigate = navigate.clone();
                leptos::task::spawn_local(async move {
                    match session.register(request).await {
                        Ok(()) => navigate(&target, NavigateOptions::default()),
                        Err(e) => info.set(e.to_string()),
                    }
                    busy.set(false);
                });
            }
            #[cfg(not(feature = "csr"))]
            let _ = (request, &session, &navigate, target);
        } else {
            let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
                Ok(pair) => pair,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };
            busy.set(true);
            info.set("Signing in...".to_owned());

            #[cfg(feature = "csr")]
            {
                let session = session.clone();
                let navigate = navigate.clone();
                leptos::task::spawn_local(async move {
                    match session.login(&email_value, &password_value).await {
                        Ok(()) => navigate(&target, NavigateOptions::default()),
                        Err(e) => info.set(e.to_string()),
                    }
                    busy.set(false);
                });
            }
            #[cfg(not(feature = "csr"))]
            let _ = (email_value, password_value, &session, &navigate, target);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"NutriVision"</h1>
                <p class="login-card__subtitle">
                    {move || if registering.get() { "Create an account" } else { "Sign in" }}
                </p>
                <form class="login-form" on:submit=on_submit>
                    <Show when=move || registering.get()>
                        <input
                            class="login-input"
                            type="text"
                            placeholder="First name"
                            prop:value=move || first_name.get()
                            on:input=move |ev| first_name.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="text"
                            placeholder="Last name"
                            prop:value=move || last_name.get()
                            on:input=move |ev| last_name.set(event_target_value(&ev))
                        />
                    </Show>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if registering.get() { "Register" } else { "Log in" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <button
                    class="login-toggle"
                    type="button"
                    on:click=move |_| {
                        registering.update(|r| *r = !*r);
                        info.set(String::new());
                    }
                >
                    {move || if registering.get() { "Have an account? Log in" } else { "New here? Register" }}
                </button>
            </div>
        </div>
    }
}
