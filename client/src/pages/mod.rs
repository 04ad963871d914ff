//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates session gating to
//! `components::require_auth`.

pub mod dashboard;
pub mod login;
pub mod settings;
