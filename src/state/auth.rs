//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate sign-in
//! redirects and identity-dependent rendering. State only changes through
//! `reduce`, which is pure so every transition is testable without a browser.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::User;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user: Option<User>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { is_authenticated: false, is_loading: true, user: None }
    }
}

impl AuthState {
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        if self.is_loading {
            AuthPhase::Loading
        } else if self.is_authenticated {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        }
    }
}

/// Coarse lifecycle position of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    Loading,
    Unauthenticated,
    Authenticated,
}

/// The three transitions the session accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthAction {
    /// Startup finished; `Some` restores a persisted user.
    Initialize(Option<User>),
    SignIn(User),
    SignOut,
}

/// Apply `action` to `state`.
///
/// `Initialize(None)` only clears the loading flag. `SignIn` and `SignOut`
/// leave `is_loading` untouched.
#[must_use]
pub fn reduce(state: &AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::Initialize(Some(user)) => {
            AuthState { is_authenticated: true, is_loading: false, user: Some(user) }
        }
        AuthAction::Initialize(None) => AuthState { is_loading: false, ..state.clone() },
        AuthAction::SignIn(user) => {
            AuthState { is_authenticated: true, user: Some(user), ..state.clone() }
        }
        AuthAction::SignOut => AuthState { is_authenticated: false, user: None, ..state.clone() },
    }
}
