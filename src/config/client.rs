//! Settings for talking to a remote tollgate instance.

use super::defaults::default_client_timeout_secs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    /// Base URL of the instance checked by `tollgate check`
    #[serde(default)]
    pub server_url: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_client_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            timeout_secs: default_client_timeout_secs(),
        }
    }
}
