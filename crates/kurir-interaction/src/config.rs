//! Backend configuration for the chat client.
//!
//! Supports reading settings from `~/.config/kurir/config.json`, with
//! environment variables as fallback.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use kurir_core::error::{KurirError, Result};

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "KURIR_BASE_URL";
/// Environment variable holding the anti-forgery token.
pub const CSRF_TOKEN_ENV: &str = "KURIR_CSRF_TOKEN";

/// Root configuration structure for config.json
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the chat backend, e.g. `https://chat.example.id`.
    pub base_url: String,
    /// Anti-forgery token sent with every POST.
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// Request timeout override, in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Loads the configuration file from ~/.config/kurir/config.json
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or not valid JSON.
pub fn load_backend_config() -> Result<BackendConfig> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        return Err(KurirError::config(format!(
            "Configuration file not found at: {}",
            config_path.display()
        )));
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        KurirError::config(format!(
            "Failed to read configuration file at {}: {}",
            config_path.display(),
            e
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        KurirError::config(format!(
            "Failed to parse configuration file at {}: {}",
            config_path.display(),
            e
        ))
    })
}

/// Builds a configuration from `KURIR_BASE_URL` / `KURIR_CSRF_TOKEN`.
///
/// Returns `None` when no base URL is set.
pub fn from_env() -> Option<BackendConfig> {
    config_from_vars(
        std::env::var(BASE_URL_ENV).ok(),
        std::env::var(CSRF_TOKEN_ENV).ok(),
    )
}

fn config_from_vars(base_url: Option<String>, csrf_token: Option<String>) -> Option<BackendConfig> {
    base_url.map(|base_url| BackendConfig {
        base_url,
        csrf_token,
        timeout_secs: None,
    })
}

/// Returns the path to the configuration file: ~/.config/kurir/config.json
fn get_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| KurirError::config("Could not determine home directory"))?;
    Ok(home.join(".config").join("kurir").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let parsed: BackendConfig = serde_json::from_str(
            r#"{"base_url": "https://chat.example.id", "csrf_token": "tok", "timeout_secs": 10}"#,
        )
        .unwrap();
        assert_eq!(parsed.base_url, "https://chat.example.id");
        assert_eq!(parsed.csrf_token.as_deref(), Some("tok"));
        assert_eq!(parsed.timeout_secs, Some(10));
    }

    #[test]
    fn test_parse_minimal_config() {
        let parsed: BackendConfig =
            serde_json::from_str(r#"{"base_url": "http://localhost:8000"}"#).unwrap();
        assert_eq!(parsed.base_url, "http://localhost:8000");
        assert_eq!(parsed.csrf_token, None);
        assert_eq!(parsed.timeout_secs, None);
    }

    #[test]
    fn test_config_from_vars_requires_base_url() {
        assert_eq!(config_from_vars(None, Some("tok".to_string())), None);

        let config =
            config_from_vars(Some("http://localhost:8000".to_string()), None).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.csrf_token, None);
    }
}
