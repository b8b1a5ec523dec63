//! Context provider exposing the session to descendant components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mount `AuthProvider` once near the root. It builds the browser-backed
//! `SessionStore`, mirrors every transition into an `RwSignal`, and on the
//! client kicks off `initialize` in the background. Descendants call
//! `use_auth_context()` for the state and the sign-in/out operations.

#[cfg(test)]
#[path = "auth_provider_test.rs"]
mod auth_provider_test;

use std::rc::Rc;

use leptos::prelude::*;

use crate::config::AuthConfig;
use crate::net::api::{AuthApi, HttpGateway};
use crate::net::types::{SignInOutcome, User};
use crate::state::auth::AuthState;
use crate::state::session::{AuthError, BrowserNavigator, Navigator, SessionStore};
use crate::state::storage::{BrowserSessionStorage, KeyValueStore};

/// Store wired to `sessionStorage`, `gloo-net`, and `window.location`.
pub type BrowserSessionStore = SessionStore<BrowserSessionStorage, HttpGateway, BrowserNavigator>;

/// Copyable handle to the session provided by [`AuthProvider`].
///
/// Generic over the store's backends so other wirings (in-memory storage,
/// scripted gateways) can be mounted the same way.
pub struct AuthContext<S = BrowserSessionStorage, A = HttpGateway, N = BrowserNavigator> {
    state: RwSignal<AuthState>,
    store: StoredValue<Rc<SessionStore<S, A, N>>, LocalStorage>,
}

impl<S, A, N> Clone for AuthContext<S, A, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, A, N> Copy for AuthContext<S, A, N> {}

impl<S, A, N> AuthContext<S, A, N>
where
    S: KeyValueStore + 'static,
    A: AuthApi + 'static,
    N: Navigator + 'static,
{
    /// Wrap `store`, mirroring its transitions into a signal.
    pub fn new(store: SessionStore<S, A, N>) -> Self {
        let state = RwSignal::new(store.state());
        store.subscribe(move |next| state.set(next.clone()));
        Self { state, store: StoredValue::new_local(Rc::new(store)) }
    }

    /// Reactive view of the session.
    pub fn state(&self) -> ReadSignal<AuthState> {
        self.state.read_only()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.is_authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.is_loading)
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }

    pub fn sign_in_path(&self) -> String {
        self.store.with_value(|s| s.config().sign_in_path.clone())
    }

    /// See [`SessionStore::skip`].
    pub fn skip(&self) {
        self.store.get_value().skip();
    }

    /// See [`SessionStore::sign_in`].
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection message.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInOutcome, AuthError> {
        let store = self.store.get_value();
        store.sign_in(email, password).await
    }

    /// See [`SessionStore::sign_up`].
    ///
    /// # Errors
    ///
    /// Always fails; sign-up is not offered.
    pub async fn sign_up(&self, email: &str, name: &str, password: &str) -> Result<(), AuthError> {
        let store = self.store.get_value();
        store.sign_up(email, name, password).await
    }

    /// See [`SessionStore::sign_out`].
    pub fn sign_out(&self) {
        self.store.get_value().sign_out();
    }

    #[cfg(feature = "hydrate")]
    fn start(&self) {
        let store = self.store.get_value();
        leptos::task::spawn_local(async move {
            store.initialize().await;
        });
    }
}

/// Provides [`AuthContext`] to `children`, configured from the build environment.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let config = AuthConfig::from_env();
    let gateway = HttpGateway::new(&config);
    let store = SessionStore::new(config, BrowserSessionStorage, gateway, BrowserNavigator);
    let auth: AuthContext = AuthContext::new(store);
    provide_context(auth);

    #[cfg(feature = "hydrate")]
    auth.start();

    children()
}

/// The session provided by the nearest [`AuthProvider`].
///
/// # Panics
///
/// Panics when called outside an `AuthProvider`.
pub fn use_auth_context() -> AuthContext {
    expect_context::<AuthContext>()
}
