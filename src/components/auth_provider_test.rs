use serde_json::json;

use super::*;
use crate::net::api::{GetRequest, PostRequest};
use crate::net::types::GatewayResponse;
use crate::state::storage::{AUTHENTICATED_KEY, MemoryStorage, SESSION_KEY};

// =============================================================
// Fakes
// =============================================================

struct CannedApi {
    login: GatewayResponse,
    permissions: GatewayResponse,
}

impl AuthApi for CannedApi {
    async fn post_request(&self, _request: PostRequest<'_>) -> GatewayResponse {
        self.login.clone()
    }

    async fn get_request(&self, _request: GetRequest<'_>) -> GatewayResponse {
        self.permissions.clone()
    }
}

struct FixedNavigator;

impl Navigator for FixedNavigator {
    fn current_path(&self) -> String {
        "/dashboard".to_owned()
    }

    fn redirect(&self, _path: &str) {}
}

type TestContext = AuthContext<Rc<MemoryStorage>, CannedApi, FixedNavigator>;

fn context_with(storage: &Rc<MemoryStorage>) -> TestContext {
    let config = AuthConfig::from_vars(Some("https://auth.test"), Some("crm"), None, Some("/login"));
    let api = CannedApi {
        login: GatewayResponse::success(json!({ "authorization_token": "tok" })),
        permissions: GatewayResponse::success(json!({
            "user": { "id": "u1", "name": "Ada", "email": "ada@example.com" },
            "permissions": ["boards:read"]
        })),
    };
    AuthContext::new(SessionStore::new(config, Rc::clone(storage), api, FixedNavigator))
}

// =============================================================
// Handle operations
// =============================================================

#[test]
fn new_context_starts_loading() {
    let owner = Owner::new();
    owner.with(|| {
        let auth = context_with(&Rc::new(MemoryStorage::new()));

        assert!(auth.is_loading());
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert_eq!(auth.sign_in_path(), "/login");
    });
}

#[test]
fn skip_through_handle_updates_signal() {
    let owner = Owner::new();
    owner.with(|| {
        let storage = Rc::new(MemoryStorage::new());
        let auth = context_with(&storage);

        auth.skip();

        let state = auth.state().get_untracked();
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert!(auth.is_authenticated());
        assert_eq!(auth.user(), Some(User::guest()));
        assert_eq!(storage.get(AUTHENTICATED_KEY), Ok(Some("true".to_owned())));
    });
}

#[test]
fn sign_out_through_handle_updates_signal() {
    let owner = Owner::new();
    owner.with(|| {
        let storage = Rc::new(MemoryStorage::new());
        let auth = context_with(&storage);
        auth.skip();
        let copy = auth;

        copy.sign_out();

        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert!(!auth.state().get_untracked().is_authenticated);
        assert_eq!(storage.get(AUTHENTICATED_KEY), Ok(None));
    });
}

#[tokio::test]
async fn sign_in_through_handle_updates_signal() {
    let owner = Owner::new();
    let storage = Rc::new(MemoryStorage::new());
    let auth = owner.with(|| context_with(&storage));

    let outcome = auth.sign_in("a@b.com", "pw").await.unwrap();

    assert_eq!(outcome.token, "tok");
    assert!(auth.is_authenticated());
    assert_eq!(auth.user().map(|u| u.name), Some("Ada".to_owned()));
    assert!(storage.get(SESSION_KEY).unwrap().is_some());
}

#[tokio::test]
async fn sign_up_through_handle_is_unsupported() {
    let owner = Owner::new();
    let auth = owner.with(|| context_with(&Rc::new(MemoryStorage::new())));

    let err = auth.sign_up("a@b.com", "Ada", "pw").await.unwrap_err();

    assert_eq!(err, AuthError::SignUpUnsupported);
    assert!(!auth.is_authenticated());
}
