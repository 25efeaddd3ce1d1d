use std::env;

use crate::error::ConfigError;
use crate::lookup::{flag_or, parse_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: String,
    /// Deadline for the shutdown tasks, in seconds.
    pub shutdown_timeout: u64,
    /// Mounts `POST /api/auth/token`. Development only: it signs whatever subject it is given.
    pub token_endpoint_enabled: bool,
    pub log_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:3000".to_string(),
            shutdown_timeout: 10,
            token_endpoint_enabled: false,
            log_dir: "storage/logs".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            addr: parse_or(&lookup, "SERVER_ADDR", defaults.addr)?,
            shutdown_timeout: parse_or(&lookup, "SHUTDOWN_TIMEOUT", defaults.shutdown_timeout)?,
            token_endpoint_enabled: flag_or(&lookup, "TOKEN_ENDPOINT_ENABLED", false)?,
            log_dir: parse_or(&lookup, "LOG_DIR", defaults.log_dir)?,
        })
    }
}
