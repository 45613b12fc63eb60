//! Root configuration types.

use super::client::ClientConfig;
use super::defaults::default_port;
use super::logging::LoggingConfig;
use super::security::SecurityConfig;
use serde::{Deserialize, Serialize};

/// Root configuration struct for tollgate.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            logging: LoggingConfig::default(),
            security: SecurityConfig::default(),
            client: ClientConfig::default(),
        }
    }
}
