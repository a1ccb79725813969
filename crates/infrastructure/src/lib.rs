//! Userflow Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus environment configuration.

pub mod adapters;
pub mod config;

pub use adapters::ReqwestHttpClient;
pub use config::{ConfigError, Settings, load_settings, load_settings_from};
