//! Default value functions for configuration fields, grouped by section.

use super::logging::LogFormat;

// =============================================================================
// Root
// =============================================================================

pub const fn default_port() -> u16 {
    3170
}

// =============================================================================
// Logging
// =============================================================================

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "tollgate.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    false
}

pub const fn default_log_format() -> LogFormat {
    LogFormat::Text
}

// =============================================================================
// Security
// =============================================================================

pub fn default_cors_origins() -> String {
    "*".to_string()
}

// =============================================================================
// Client
// =============================================================================

pub const fn default_client_timeout_secs() -> u64 {
    10
}
