//! Configuration module for tollgate.
//!
//! Configuration is JSON, merged from several sources (see [`loader::load_from`])
//! with per-field environment overrides on top.
//!
//! # Module Structure
//!
//! - [`crate::config::types`]: Root `Config` struct
//! - [`security`]: Infra tokens and CORS
//! - [`client`]: Remote check settings
//! - [`logging`]: Logging configuration
//! - [`crate::config::loader`]: Configuration loading functions
//! - [`crate::config::validation`]: Configuration validation functions
//! - [`crate::config::defaults`]: Default value functions

pub mod client;
pub mod defaults;
pub mod loader;
pub mod logging;
pub mod security;
pub mod types;
pub mod validation;

pub use client::ClientConfig;

pub use loader::{load, load_from};

pub use logging::{LogFormat, LogLevel, LoggingConfig};

pub use security::{SecurityConfig, TokenEntry};

pub use types::Config;

pub use validation::validate_config;
