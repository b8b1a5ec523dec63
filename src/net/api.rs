//! HTTP gateway to the auth backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native builds: every call reports the gateway as
//! unavailable, which callers see as the generic failure shape.
//!
//! ERROR HANDLING
//! ==============
//! Gateway calls never fail. Transport and decode errors are logged and
//! normalized into `GatewayResponse` so session code only has one shape to
//! inspect.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::Value;

use super::types::{GENERIC_ERROR_MESSAGE, GatewayResponse};
use crate::config::AuthConfig;

/// Login endpoint.
pub const LOGIN_PATH: &str = "/auth/login";
/// Token validation endpoint.
pub const PERMISSIONS_PATH: &str = "/auth/permissions?is_debug=true";

/// A JSON `POST` against the gateway base URL.
#[derive(Clone, Debug)]
pub struct PostRequest<'a> {
    pub url: &'a str,
    pub body: Value,
}

/// A bearer-authenticated `GET` against the gateway base URL.
#[derive(Clone, Debug)]
pub struct GetRequest<'a> {
    pub url: &'a str,
    pub token: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("http gateway not available in this build")]
    Unavailable,
}

/// The two calls the session store makes against the backend.
///
/// Futures are not `Send`; everything runs on the browser event loop.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn post_request(&self, request: PostRequest<'_>) -> GatewayResponse;
    async fn get_request(&self, request: GetRequest<'_>) -> GatewayResponse;
}

/// `gloo-net` backed gateway.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    base_url: String,
}

impl HttpGateway {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self { base_url: config.api_base_url.clone() }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl AuthApi for HttpGateway {
    async fn post_request(&self, request: PostRequest<'_>) -> GatewayResponse {
        let url = self.endpoint(request.url);
        match send_post(&url, &request.body).await {
            Ok(body) => {
                leptos::logging::log!("auth gateway POST {url}: {body}");
                shape_post_response(&body)
            }
            Err(e) => {
                leptos::logging::warn!("auth gateway POST {url} failed: {e}");
                GatewayResponse::generic_failure()
            }
        }
    }

    async fn get_request(&self, request: GetRequest<'_>) -> GatewayResponse {
        let url = self.endpoint(request.url);
        match send_get(&url, request.token).await {
            Ok(body) => {
                leptos::logging::log!("auth gateway GET {url}: {body}");
                shape_get_response(&body)
            }
            Err(e) => {
                leptos::logging::warn!("auth gateway GET {url} failed: {e}");
                GatewayResponse::generic_failure()
            }
        }
    }
}

/// A `POST` body is a success only when the backend marks it complete and
/// includes a non-null `data` payload.
pub fn shape_post_response(body: &Value) -> GatewayResponse {
    let complete = body.get("is_complete").and_then(Value::as_bool).unwrap_or(false);
    match body.get("data") {
        Some(data) if complete && !data.is_null() => GatewayResponse::success(data.clone()),
        _ => GatewayResponse::failure(first_error_message(body)),
    }
}

/// A `GET` body is a success whenever it carries a non-null `data` payload.
pub fn shape_get_response(body: &Value) -> GatewayResponse {
    match body.get("data") {
        Some(data) if !data.is_null() => GatewayResponse::success(data.clone()),
        _ => GatewayResponse::failure(first_error_message(body)),
    }
}

/// First backend error text: `errors[0].msg`, then `message[0].error_code`,
/// then the generic message.
fn first_error_message(body: &Value) -> String {
    body.pointer("/errors/0/msg")
        .or_else(|| body.pointer("/message/0/error_code"))
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty())
        .unwrap_or(GENERIC_ERROR_MESSAGE)
        .to_owned()
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(any(test, feature = "hydrate"))]
fn parse_body(raw: &str) -> Result<Value, GatewayError> {
    serde_json::from_str(raw).map_err(|e| GatewayError::Decode(e.to_string()))
}

async fn send_post(url: &str, body: &Value) -> Result<Value, GatewayError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(url)
            .json(body)
            .map_err(|e| GatewayError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let raw = resp.text().await.map_err(|e| GatewayError::Transport(e.to_string()))?;
        parse_body(&raw)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (url, body);
        Err(GatewayError::Unavailable)
    }
}

async fn send_get(url: &str, token: &str) -> Result<Value, GatewayError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(url)
            .header("Authorization", &bearer_header(token))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let raw = resp.text().await.map_err(|e| GatewayError::Transport(e.to_string()))?;
        parse_body(&raw)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (url, token);
        Err(GatewayError::Unavailable)
    }
}
