//! Build-time configuration for the auth backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The crate runs in the browser, where there is no process environment, so
//! settings are baked in at compile time through `option_env!`. Tests and
//! embedders construct the config directly with `AuthConfig::from_vars`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Default route for the sign-in page.
pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";

/// Settings for talking to the auth backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    /// Base URL prepended to every gateway path (e.g. `https://auth.example.com`).
    pub api_base_url: String,
    /// Service name sent with login requests.
    pub service_name: String,
    /// Path substrings exempt from token validation.
    pub public_paths: Vec<String>,
    /// Where to send users that have no token.
    pub sign_in_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            service_name: String::new(),
            public_paths: Vec::new(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_owned(),
        }
    }
}

impl AuthConfig {
    /// Load from `AUTH_API_URL`, `AUTH_SERVICE_NAME`, `AUTH_PUBLIC_PATHS`, and
    /// `AUTH_SIGN_IN_PATH` as seen by the compiler.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            option_env!("AUTH_API_URL"),
            option_env!("AUTH_SERVICE_NAME"),
            option_env!("AUTH_PUBLIC_PATHS"),
            option_env!("AUTH_SIGN_IN_PATH"),
        )
    }

    /// Build a config from raw variable values. Missing values fall back to
    /// empty strings, no public paths, and `/sign-in`.
    #[must_use]
    pub fn from_vars(
        api_base_url: Option<&str>,
        service_name: Option<&str>,
        public_paths: Option<&str>,
        sign_in_path: Option<&str>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.unwrap_or_default().trim_end_matches('/').to_owned(),
            service_name: service_name.unwrap_or_default().to_owned(),
            public_paths: public_paths.map(parse_public_paths).unwrap_or_default(),
            sign_in_path: sign_in_path
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(DEFAULT_SIGN_IN_PATH)
                .to_owned(),
        }
    }

    /// Full URL for a gateway path such as `/auth/login`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }

    /// Whether `pathname` contains any configured public path substring.
    #[must_use]
    pub fn is_public_path(&self, pathname: &str) -> bool {
        self.public_paths.iter().any(|p| pathname.contains(p.as_str()))
    }
}

/// Split a comma-separated list, dropping blank entries. A blank entry would
/// otherwise match every path.
pub fn parse_public_paths(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}
