//! Gatehouse Core - Configuration and shared types
//!
//! This crate defines the configuration layer used throughout the gatehouse
//! identity service:
//! - Application configuration (environment variables, TOML files)
//! - Configuration error types

pub mod config;

pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig,
};
