use super::*;
use serde_json::json;

// =============================================================
// shape_post_response
// =============================================================

#[test]
fn post_success_requires_complete_and_data() {
    let resp = shape_post_response(&json!({
        "is_complete": true,
        "data": { "authorization_token": "tok" }
    }));
    assert!(!resp.error);
    assert_eq!(resp.data, Some(json!({ "authorization_token": "tok" })));
    assert!(resp.error_message.is_none());
}

#[test]
fn post_complete_without_data_is_failure() {
    let resp = shape_post_response(&json!({ "is_complete": true, "data": null }));
    assert!(resp.error);
    assert!(resp.data.is_none());
    assert_eq!(resp.message(), "Something went wrong");
}

#[test]
fn post_data_without_complete_is_failure() {
    let resp = shape_post_response(&json!({ "data": { "authorization_token": "tok" } }));
    assert!(resp.error);
    let resp = shape_post_response(&json!({ "is_complete": false, "data": { "a": 1 } }));
    assert!(resp.error);
}

#[test]
fn post_failure_uses_first_error_msg() {
    let resp = shape_post_response(&json!({
        "is_complete": false,
        "errors": [{ "msg": "INVALID_CREDENTIALS" }, { "msg": "OTHER" }]
    }));
    assert_eq!(resp.error_message.as_deref(), Some("INVALID_CREDENTIALS"));
}

#[test]
fn post_failure_falls_back_to_error_code() {
    let resp = shape_post_response(&json!({ "message": [{ "error_code": "USER_LOCKED" }] }));
    assert_eq!(resp.message(), "USER_LOCKED");
}

#[test]
fn post_failure_with_empty_errors_is_generic() {
    let resp = shape_post_response(&json!({ "errors": [] }));
    assert_eq!(resp.message(), GENERIC_ERROR_MESSAGE);
    let resp = shape_post_response(&json!(null));
    assert_eq!(resp.message(), GENERIC_ERROR_MESSAGE);
}

// =============================================================
// shape_get_response
// =============================================================

#[test]
fn get_success_keyed_on_data() {
    let resp = shape_get_response(&json!({ "data": { "user": { "id": "u1" } } }));
    assert!(!resp.error);
    assert_eq!(resp.data, Some(json!({ "user": { "id": "u1" } })));
}

#[test]
fn get_without_data_uses_error_msg() {
    let resp = shape_get_response(&json!({ "errors": [{ "msg": "TOKEN_EXPIRED" }] }));
    assert!(resp.error);
    assert_eq!(resp.message(), "TOKEN_EXPIRED");
}

// =============================================================
// helpers
// =============================================================

#[test]
fn bearer_header_formats_token() {
    assert_eq!(bearer_header("abc"), "Bearer abc");
}

#[test]
fn parse_body_reports_decode_errors() {
    assert_eq!(parse_body("{\"data\":1}").unwrap(), json!({ "data": 1 }));
    assert!(matches!(parse_body("<html>"), Err(GatewayError::Decode(_))));
}

#[test]
fn gateway_joins_base_url_and_path() {
    let config = AuthConfig::from_vars(Some("https://auth.example.com/"), None, None, None);
    let gateway = HttpGateway::new(&config);
    assert_eq!(gateway.endpoint(LOGIN_PATH), "https://auth.example.com/auth/login");
    assert_eq!(
        gateway.endpoint(PERMISSIONS_PATH),
        "https://auth.example.com/auth/permissions?is_debug=true"
    );
}

#[cfg(not(feature = "hydrate"))]
#[tokio::test]
async fn gateway_outside_browser_returns_generic_failure() {
    let gateway = HttpGateway::new(&AuthConfig::default());
    let post = gateway
        .post_request(PostRequest { url: LOGIN_PATH, body: json!({}) })
        .await;
    assert_eq!(post, GatewayResponse::generic_failure());
    let get = gateway
        .get_request(GetRequest { url: PERMISSIONS_PATH, token: "tok" })
        .await;
    assert_eq!(get, GatewayResponse::generic_failure());
}
