//! Loads runner settings from environment variables.

use thiserror::Error;
use tracing::debug;
use userflow_domain::{ApiConfig, DEFAULT_BASE_URL, DomainError};

/// Base URL of the users API.
pub const BASE_URL_VAR: &str = "USERFLOW_BASE_URL";
/// Per-request timeout in milliseconds.
pub const TIMEOUT_MS_VAR: &str = "USERFLOW_TIMEOUT_MS";
/// When truthy, the run report is printed as JSON.
pub const REPORT_JSON_VAR: &str = "USERFLOW_REPORT_JSON";

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL is not an absolute http(s) URL.
    #[error("USERFLOW_BASE_URL: {0}")]
    InvalidBaseUrl(#[from] DomainError),

    /// The timeout is not a positive integer.
    #[error("USERFLOW_TIMEOUT_MS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),
}

/// Settings for one run of the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Target API.
    pub api: ApiConfig,
    /// Print the run report as JSON.
    pub report_json: bool,
}

/// Loads settings from the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(|key| std::env::var(key).ok())
}

/// Loads settings through `lookup`, which maps a variable name to its value.
///
/// Unset or blank variables fall back to their defaults.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_settings_from<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let base_url = get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let mut api = ApiConfig::new(base_url.trim())?;

    if let Some(raw) = get(TIMEOUT_MS_VAR) {
        let timeout_ms = raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
        api = api.with_timeout_ms(timeout_ms);
    }

    let report_json = get(REPORT_JSON_VAR)
        .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

    debug!(
        base_url = %api.base_url(),
        timeout_ms = api.timeout_ms,
        report_json,
        "settings loaded"
    );
    Ok(Settings { api, report_json })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use userflow_domain::request::DEFAULT_TIMEOUT_MS;

    fn load(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        load_settings_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[]).unwrap();
        assert_eq!(settings.api.base_url().as_str(), "https://fakestoreapi.com/");
        assert_eq!(settings.api.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(!settings.report_json);
    }

    #[test]
    fn test_overrides() {
        let settings = load(&[
            (BASE_URL_VAR, "http://127.0.0.1:9000"),
            (TIMEOUT_MS_VAR, " 2500 "),
            (REPORT_JSON_VAR, "TRUE"),
        ])
        .unwrap();

        assert_eq!(
            settings.api.users_url().unwrap().as_str(),
            "http://127.0.0.1:9000/users"
        );
        assert_eq!(settings.api.timeout_ms, 2500);
        assert!(settings.report_json);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let settings = load(&[(BASE_URL_VAR, "  "), (TIMEOUT_MS_VAR, "")]).unwrap();
        assert_eq!(settings.api.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&[(BASE_URL_VAR, "ftp://example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
        assert!(err.to_string().starts_with("USERFLOW_BASE_URL: "));
    }

    #[test]
    fn test_invalid_timeout() {
        assert_eq!(
            load(&[(TIMEOUT_MS_VAR, "0")]).unwrap_err(),
            ConfigError::InvalidTimeout("0".to_string())
        );
        assert!(load(&[(TIMEOUT_MS_VAR, "soon")]).is_err());
    }
}
