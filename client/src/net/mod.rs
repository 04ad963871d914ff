//! Networking modules for the identity API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` defines the `AuthApi` / `ProfileApi` seams and the reqwest-backed
//! implementation; `types` defines the shared wire schema.

pub mod api;
pub mod types;
