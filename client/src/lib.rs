//! NutriVision browser client: session and profile stores, route guard, and
//! the Leptos pages that exercise them.
//!
//! ARCHITECTURE
//! ============
//! `net` owns the HTTP contract, `state` owns the stores, `util` holds the
//! framework-free guard state machine and navigation seam, and `components` /
//! `pages` bind those pieces to Leptos. Everything outside `app`, `components`
//! and `pages` is usable natively, which is how the CLI and tests drive it.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
