//! Client-side stores.
//!
//! ARCHITECTURE
//! ============
//! `auth` owns who is signed in; `profile` caches the signed-in user's health
//! profile. Both are injected into the UI through Leptos context by `app`.

pub mod auth;
pub mod profile;
