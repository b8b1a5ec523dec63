//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes should apply identical unauthenticated redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::components::auth_provider::AuthContext;
use crate::net::api::AuthApi;
use crate::state::auth::AuthState;
use crate::state::session::Navigator;
use crate::state::storage::KeyValueStore;

/// True once loading has finished and nobody is signed in.
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.is_loading && !state.is_authenticated
}

/// Redirect to the configured sign-in path whenever auth has loaded and no
/// user is signed in.
pub fn install_unauth_redirect<S, A, N, F>(auth: AuthContext<S, A, N>, navigate: F)
where
    S: KeyValueStore + 'static,
    A: AuthApi + 'static,
    N: Navigator + 'static,
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let sign_in_path = auth.sign_in_path();
    let state = auth.state();
    Effect::new(move || {
        if state.with(should_redirect_unauth) {
            navigate(&sign_in_path, NavigateOptions::default());
        }
    });
}
