//! Infra token and HTTP boundary configuration.

use super::defaults::default_cors_origins;
use crate::auth::StoredToken;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    /// Allowed CORS origins (comma-separated, or "*" for any)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
    /// Optional JSON file with additional token records
    #[serde(default)]
    pub tokens_file: Option<String>,
    /// Tokens declared inline
    #[serde(default)]
    pub tokens: Vec<TokenEntry>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: default_cors_origins(),
            tokens_file: None,
            tokens: Vec::new(),
        }
    }
}

/// An infra token declared in configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TokenEntry {
    pub token: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(alias = "expiresOn")]
    pub expires_on: DateTime<Utc>,
}

impl From<TokenEntry> for StoredToken {
    fn from(entry: TokenEntry) -> Self {
        Self {
            token: entry.token,
            label: entry.label,
            expires_on: entry.expires_on,
        }
    }
}
