//! Session store: the only writer of `AuthState`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Built once at startup from injected storage, gateway, and navigator
//! implementations, then shared with components through `AuthProvider`.
//! Every state change goes through `dispatch`, which runs the pure reducer and
//! notifies the subscribed listener (the provider's signal).
//!
//! ERROR HANDLING
//! ==============
//! Storage and gateway failures are logged and degrade to "signed out".
//! A rejected token also clears the persisted session; a permission payload
//! that cannot be read leaves it in place. Only `sign_in` and `sign_up` report
//! errors to the caller.
//!
//! CONCURRENCY
//! ===========
//! Runs on a single thread. Each token validation takes a generation number;
//! sign-in, sign-out, and newer validations advance it, and a validation whose
//! generation is no longer current discards its response.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::auth::{AuthAction, AuthState, reduce};
use super::storage::{
    KeyValueStore, clear_session, read_authenticated_flag, read_session, write_authenticated_flag, write_session,
};
use crate::config::AuthConfig;
use crate::net::api::{AuthApi, GetRequest, LOGIN_PATH, PERMISSIONS_PATH, PostRequest};
use crate::net::types::{GENERIC_ERROR_MESSAGE, LoginData, LoginRequest, PermissionsData, SignInOutcome, User};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Login rejected; the message is the backend's error text.
    #[error("{0}")]
    SignIn(String),
    #[error("Sign up is not implemented")]
    SignUpUnsupported,
    /// A sign-out or another sign-in happened while the login was in flight.
    #[error("Sign in was superseded")]
    Superseded,
}

/// Page location collaborator used for public-path checks and redirects.
pub trait Navigator {
    /// Current page path (e.g. `/dashboard`).
    fn current_path(&self) -> String;
    /// Send the browser to `path`.
    fn redirect(&self, path: &str);
}

/// `window.location` backed navigator. Inert outside `hydrate`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_default()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            String::new()
        }
    }

    fn redirect(&self, path: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(path);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = path;
        }
    }
}

type Listener = Rc<dyn Fn(&AuthState)>;

pub struct SessionStore<S, A, N> {
    config: AuthConfig,
    storage: S,
    api: A,
    navigator: N,
    state: RefCell<AuthState>,
    listener: RefCell<Option<Listener>>,
    initialized: Cell<bool>,
    generation: Cell<u64>,
}

impl<S, A, N> SessionStore<S, A, N>
where
    S: KeyValueStore,
    A: AuthApi,
    N: Navigator,
{
    pub fn new(config: AuthConfig, storage: S, api: A, navigator: N) -> Self {
        Self {
            config,
            storage,
            api,
            navigator,
            state: RefCell::new(AuthState::default()),
            listener: RefCell::new(None),
            initialized: Cell::new(false),
            generation: Cell::new(0),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Register the callback run after every transition, replacing any previous one.
    pub fn subscribe(&self, listener: impl Fn(&AuthState) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Apply a transition and notify the listener. The listener may call back
    /// into the store, including `subscribe`.
    pub fn dispatch(&self, action: AuthAction) {
        let next = reduce(&self.state.borrow(), action);
        *self.state.borrow_mut() = next.clone();
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(&next);
        }
    }

    /// Restore the persisted session. Only the first call does anything.
    pub async fn initialize(&self) {
        if self.initialized.replace(true) {
            return;
        }
        leptos::logging::log!("auth: initialize");

        let authenticated = read_authenticated_flag(&self.storage).unwrap_or_else(|e| {
            leptos::logging::error!("auth: reading session flag failed: {e}");
            false
        });
        if !authenticated {
            self.dispatch(AuthAction::Initialize(None));
            return;
        }

        match read_session(&self.storage) {
            Ok(Some(session)) => {
                self.dispatch(AuthAction::Initialize(Some(session.user)));
                self.check_token(Some(&session.token)).await;
            }
            Ok(None) => self.dispatch(AuthAction::Initialize(None)),
            Err(e) => {
                leptos::logging::error!("auth: reading session failed: {e}");
                self.dispatch(AuthAction::Initialize(None));
            }
        }
    }

    /// Log in with email and password, then validate the issued token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SignIn` carrying the backend's first error message,
    /// or the generic message when none is given. Returns
    /// `AuthError::Superseded` when the session changed while the login
    /// request was in flight.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome, AuthError> {
        leptos::logging::log!("auth: sign in {email}");
        let generation = self.next_generation();
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
            service: self.config.service_name.clone(),
        };
        let body = serde_json::to_value(&body).map_err(|e| AuthError::SignIn(e.to_string()))?;
        let response = self.api.post_request(PostRequest { url: LOGIN_PATH, body }).await;
        if response.error {
            leptos::logging::warn!("auth: sign in rejected: {}", response.message());
            return Err(AuthError::SignIn(response.message().to_owned()));
        }

        let token = match response.decode::<LoginData>() {
            Ok(data) if !data.authorization_token.is_empty() => data.authorization_token,
            Ok(_) => {
                leptos::logging::warn!("auth: sign in response carried an empty token");
                return Err(AuthError::SignIn(GENERIC_ERROR_MESSAGE.to_owned()));
            }
            Err(e) => {
                leptos::logging::warn!("auth: sign in response missing token: {e}");
                return Err(AuthError::SignIn(GENERIC_ERROR_MESSAGE.to_owned()));
            }
        };

        if generation != self.generation.get() {
            leptos::logging::log!("auth: discarding superseded sign in");
            return Err(AuthError::Superseded);
        }

        self.check_token(Some(&token)).await;
        Ok(SignInOutcome { success: true, token })
    }

    /// Account creation is not offered.
    ///
    /// # Errors
    ///
    /// Always returns `AuthError::SignUpUnsupported`.
    #[allow(clippy::unused_async)]
    pub async fn sign_up(&self, email: &str, name: &str, password: &str) -> Result<(), AuthError> {
        let _ = (email, name, password);
        Err(AuthError::SignUpUnsupported)
    }

    /// Forget the user and the persisted session.
    pub fn sign_out(&self) {
        leptos::logging::log!("auth: sign out");
        self.next_generation();
        if let Err(e) = clear_session(&self.storage) {
            leptos::logging::error!("auth: clearing session failed: {e}");
        }
        self.dispatch(AuthAction::SignOut);
    }

    /// Sign in as the local guest user without contacting the backend.
    pub fn skip(&self) {
        leptos::logging::log!("auth: continuing as guest");
        self.next_generation();
        if let Err(e) = write_authenticated_flag(&self.storage) {
            leptos::logging::error!("auth: writing session flag failed: {e}");
        }
        self.dispatch(AuthAction::SignIn(User::guest()));
    }

    /// Validate `token` against `/auth/permissions` and sign in or out
    /// accordingly. Public pages skip validation; a missing token redirects to
    /// the sign-in page.
    async fn check_token(&self, token: Option<&str>) {
        let path = self.navigator.current_path();
        if self.config.is_public_path(&path) {
            leptos::logging::log!("auth: {path} is public, skipping token check");
            return;
        }

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            leptos::logging::warn!("auth: no token, redirecting to {}", self.config.sign_in_path);
            self.navigator.redirect(&self.config.sign_in_path);
            return;
        };

        let generation = self.next_generation();
        let response = self.api.get_request(GetRequest { url: PERMISSIONS_PATH, token }).await;
        if generation != self.generation.get() {
            leptos::logging::log!("auth: discarding stale permission check");
            return;
        }

        if response.error {
            leptos::logging::warn!("auth: token rejected: {}", response.message());
            self.sign_out();
            return;
        }

        match response.decode::<PermissionsData>() {
            Ok(data) => {
                let session = data.into_session(token);
                if let Err(e) = write_session(&self.storage, &session) {
                    leptos::logging::error!("auth: persisting session failed: {e}");
                }
                leptos::logging::log!("auth: token valid for user {}", session.user.id);
                self.dispatch(AuthAction::SignIn(session.user));
            }
            Err(e) => {
                // Keep the persisted record; a reload retries validation.
                leptos::logging::error!("auth: unreadable permission payload: {e}");
                self.dispatch(AuthAction::SignOut);
            }
        }
    }

    fn next_generation(&self) -> u64 {
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        next
    }
}
