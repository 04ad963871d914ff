//! Settings page: edit the health profile.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider loads the profile once; this page refreshes it on mount so a
//! session started after that load still sees its own profile. A missing
//! profile is not an error; the form simply starts empty and the first save
//! creates it.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use leptos::prelude::*;

use crate::app::AppProfile;
use crate::components::require_auth::RequireAuth;
use crate::net::types::{HealthProfile, ProfilePatch};
use crate::state::profile::ProfileState;

/// Turn raw form fields into a patch. Blank text fields are sent as empty
/// strings so the server clears them.
fn patch_from_form(age: &str, gender: &str, allergies: &str) -> Result<ProfilePatch, &'static str> {
    let age = age.trim();
    let age = if age.is_empty() {
        None
    } else {
        Some(age.parse::<u32>().ok().filter(|a| *a <= 130).ok_or("Age must be a whole number between 0 and 130.")?)
    };
    Ok(ProfilePatch { age, gender: Some(gender.trim().to_owned()), allergies: Some(allergies.trim().to_owned()) })
}

/// The part of the store state that drives the form. `loading` and `error`
/// changes leave it equal, so typed values survive a failed save.
fn form_source(state: &ProfileState) -> Option<HealthProfile> {
    state.profile.clone()
}

fn form_fields(profile: Option<&HealthProfile>) -> (String, String, String) {
    profile.map_or_else(Default::default, |p| {
        (
            p.age.map(|a| a.to_string()).unwrap_or_default(),
            p.gender.clone().unwrap_or_default(),
            p.allergies.clone().unwrap_or_default(),
        )
    })
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let store = expect_context::<AppProfile>();
    let profile_state = expect_context::<RwSignal<ProfileState>>();

    let age = RwSignal::new(String::new());
    let gender = RwSignal::new(String::new());
    let allergies = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());

    let profile = Memo::new(move |_| profile_state.with(form_source));
    Effect::new(move || {
        let (a, g, al) = form_fields(profile.get().as_ref());
        age.set(a);
        gender.set(g);
        allergies.set(al);
    });

    #[cfg(feature = "csr")]
    {
        let loader = store.clone();
        leptos::task::spawn_local(async move { loader.refresh().await });
    }

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let patch = match patch_from_form(&age.get(), &gender.get(), &allergies.get()) {
            Ok(patch) => patch,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        info.set("Saving...".to_owned());

        #[cfg(feature = "csr")]
        {
            let store = store.clone();
            leptos::task::spawn_local(async move {
                match store.save(&patch).await {
                    Ok(_) => info.set("Saved.".to_owned()),
                    Err(e) => info.set(e.to_string()),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        let _ = (patch, &store);
    };

    view! {
        <RequireAuth>
            <div class="settings-page">
                <h1>"Health profile"</h1>
                <Show when=move || profile_state.get().loading>
                    <p class="settings-loading">"Loading profile..."</p>
                </Show>
                <Show when=move || profile_state.get().error.is_some()>
                    <p class="settings-error">{move || profile_state.get().error.unwrap_or_default()}</p>
                </Show>
                <form class="settings-form" on:submit=on_save.clone()>
                    <label>
                        "Age"
                        <input
                            type="number"
                            min="0"
                            max="130"
                            prop:value=move || age.get()
                            on:input=move |ev| age.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Gender"
                        <input
                            type="text"
                            prop:value=move || gender.get()
                            on:input=move |ev| gender.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Allergies"
                        <input
                            type="text"
                            prop:value=move || allergies.get()
                            on:input=move |ev| allergies.set(event_target_value(&ev))
                        />
                    </label>
                    <button type="submit" disabled=move || profile_state.get().loading>"Save"</button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="settings-message">{move || info.get()}</p>
                </Show>
                <a href="/dashboard">"Back to dashboard"</a>
            </div>
        </RequireAuth>
    }
}
