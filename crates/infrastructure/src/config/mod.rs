//! Environment-driven configuration.

mod env;

pub use env::{
    BASE_URL_VAR, ConfigError, REPORT_JSON_VAR, Settings, TIMEOUT_MS_VAR, load_settings,
    load_settings_from,
};
