use super::*;

// =============================================================
// from_vars
// =============================================================

#[test]
fn from_vars_defaults_when_missing() {
    let config = AuthConfig::from_vars(None, None, None, None);
    assert_eq!(config, AuthConfig::default());
    assert_eq!(config.sign_in_path, "/sign-in");
}

#[test]
fn from_vars_trims_trailing_slash_from_base_url() {
    let config = AuthConfig::from_vars(Some("https://auth.example.com/"), Some("crm"), None, None);
    assert_eq!(config.api_base_url, "https://auth.example.com");
    assert_eq!(config.service_name, "crm");
    assert_eq!(config.endpoint("/auth/login"), "https://auth.example.com/auth/login");
}

#[test]
fn from_vars_blank_sign_in_path_uses_default() {
    let config = AuthConfig::from_vars(None, None, None, Some("  "));
    assert_eq!(config.sign_in_path, DEFAULT_SIGN_IN_PATH);
    let config = AuthConfig::from_vars(None, None, None, Some("/login"));
    assert_eq!(config.sign_in_path, "/login");
}

// =============================================================
// public paths
// =============================================================

#[test]
fn parse_public_paths_splits_and_trims() {
    assert_eq!(parse_public_paths("/public, /reset-password"), vec!["/public", "/reset-password"]);
}

#[test]
fn parse_public_paths_drops_blank_entries() {
    assert_eq!(parse_public_paths(",/public,, ,"), vec!["/public"]);
    assert!(parse_public_paths("").is_empty());
}

#[test]
fn is_public_path_matches_substrings() {
    let config = AuthConfig::from_vars(None, None, Some("/public,/docs"), None);
    assert!(config.is_public_path("/public/landing"));
    assert!(config.is_public_path("/app/docs/intro"));
    assert!(!config.is_public_path("/dashboard"));
}

#[test]
fn is_public_path_false_without_entries() {
    let config = AuthConfig::default();
    assert!(!config.is_public_path("/"));
    assert!(!config.is_public_path(""));
}
