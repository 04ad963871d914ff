//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the session and profile stores from Leptos context
//! providers installed by `app::App`.

pub mod require_auth;
