//! # concert-client
//!
//! Leptos + WASM session layer for the concert booking frontend.
//!
//! This crate holds the browser-side authentication state (`state::session`),
//! the policy for reacting to 401/403 responses (`net::unauthorized`), the
//! REST helpers that attach the bearer token (`net::api`), and the route
//! guard that keeps logged-out users off protected pages (`util::auth`).
//! Pages and styling live in the application that consumes it.

pub mod app;
pub mod config;
pub mod net;
pub mod state;
pub mod storage;
pub mod util;

/// Route `log` output to the browser console and install the panic hook.
#[cfg(feature = "hydrate")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // Errors only when a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Debug);
}
