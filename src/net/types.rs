//! Wire DTOs for the auth backend and the persisted session record.
//!
//! DESIGN
//! ======
//! Unknown backend fields are kept in flattened maps so a session written to
//! storage and read back later carries everything the backend sent.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Message used whenever the backend gives no usable error text.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// The signed-in user as returned by `/auth/permissions`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend user identifier. Numeric ids are kept as strings; a missing or
    /// null id decodes as empty.
    #[serde(default, alias = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    /// Avatar image URL or asset path, if any.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Display name.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub name: String,
    /// Account email.
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub email: String,
    /// Permission payload attached after token validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Value>,
    /// Any other fields the backend includes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Fixed local user signed in by `skip` without contacting the backend.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            id: "guest".to_owned(),
            avatar: None,
            name: "Guest".to_owned(),
            email: String::new(),
            permissions: None,
            extra: Map::new(),
        }
    }
}

/// Normalized result of every gateway call. Gateway functions never fail;
/// they return this shape instead.
#[derive(Clone, Debug, PartialEq)]
pub struct GatewayResponse {
    pub error: bool,
    pub data: Option<Value>,
    pub error_message: Option<String>,
}

impl GatewayResponse {
    #[must_use]
    pub fn success(data: Value) -> Self {
        Self { error: false, data: Some(data), error_message: None }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self { error: true, data: None, error_message: Some(message.into()) }
    }

    /// Failure carrying [`GENERIC_ERROR_MESSAGE`].
    #[must_use]
    pub fn generic_failure() -> Self {
        Self::failure(GENERIC_ERROR_MESSAGE)
    }

    /// Decode the success payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns a message if this is a failure response or `data` does not fit `T`.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, String> {
        if self.error {
            return Err(self.message().to_owned());
        }
        let data = self.data.clone().ok_or_else(|| GENERIC_ERROR_MESSAGE.to_owned())?;
        serde_json::from_value(data).map_err(|e| e.to_string())
    }

    /// Error text, falling back to [`GENERIC_ERROR_MESSAGE`].
    #[must_use]
    pub fn message(&self) -> &str {
        self.error_message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE)
    }
}

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub service: String,
}

/// Success payload of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginData {
    pub authorization_token: String,
}

/// Success payload of `GET /auth/permissions`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PermissionsData {
    pub user: User,
    #[serde(default)]
    pub permissions: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PermissionsData {
    /// Build the record to persist for `token`, attaching `permissions` to
    /// the user and keeping them at the top level as the backend sent them.
    /// The issued token replaces any `token` the payload carried.
    #[must_use]
    pub fn into_session(self, token: &str) -> PersistedSession {
        let Self { mut user, permissions, mut extra } = self;
        extra.remove("token");
        extra.insert("permissions".to_owned(), permissions.clone());
        user.permissions = Some(permissions);
        PersistedSession { user, token: token.to_owned(), extra }
    }
}

/// Session record kept under the `session` storage key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub user: User,
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Value returned by a successful sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignInOutcome {
    pub success: bool,
    pub token: String,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(D::Error::custom("expected string or number id")),
    }
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
