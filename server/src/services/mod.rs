//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation, hashing, token, and persistence concerns so
//! route handlers stay focused on protocol translation and cookie plumbing.

pub mod account;
pub mod password;
pub mod profile;
pub mod token;
