use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.agakayi.app";

/// Environment variable consulted for the API base URL when the builder
/// does not set one explicitly.
pub const API_URL_ENV: &str = "AGAKAYI_API_URL";

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const TRANSACTIONS_PATH: &str = "/transactions";

pub const SESSION_FILE: &str = "session.json";

/// Resolve the API base URL: `AGAKAYI_API_URL` if set, the built-in
/// default otherwise. Trailing slashes are trimmed by the client.
pub fn default_api_url() -> String {
    env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

pub fn default_session_dir() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        config.join("agakayi-sdk")
    } else {
        PathBuf::from(".agakayi-sdk")
    }
}
