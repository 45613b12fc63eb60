#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

//! # Tollgate
//!
//! Bearer infra-token authorization for HTTP endpoints, plus the CLI error
//! taxonomy used to report failures of the `tollgate` binary.

/// Infra token gate and axum middleware
pub mod auth;

/// Remote token checks over HTTP
pub mod client;

/// Configuration loading and environment variables
pub mod config;

/// Structured logging configuration
pub mod logging;

/// CLI error classification and reporting
pub mod report;

/// Gated HTTP router
pub mod server;

/// Token file loading
pub mod token_file;

/// Offline token verification
pub mod verify;
