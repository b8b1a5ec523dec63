//! # auth-session
//!
//! Leptos + WASM authentication session layer for browser front-ends.
//!
//! This crate tracks whether the current browser user is signed in, persists
//! the session token in `sessionStorage`, validates it against the auth
//! backend, and exposes the result to descendant components through the
//! `AuthProvider` context.

pub mod components;
pub mod config;
pub mod net;
pub mod state;
pub mod util;

/// Install the browser console logger and panic hook.
///
/// No-op outside the `hydrate` build.
pub fn init_logging() {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Debug);
    }
}
