use std::env;

use crate::error::ConfigError;
use crate::lookup::{flag_or, list_or};

pub const DEFAULT_ALLOWED_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "OPTIONS"];
pub const DEFAULT_ALLOWED_HEADERS: &[&str] = &["Content-Type", "Authorization", "X-Requested-With"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    /// `*` allows any origin.
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: DEFAULT_ALLOWED_METHODS.iter().map(|s| s.to_string()).collect(),
            allowed_headers: DEFAULT_ALLOWED_HEADERS.iter().map(|s| s.to_string()).collect(),
            allow_credentials: false,
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            allowed_origins: list_or(&lookup, "ALLOWED_ORIGINS", &["*"]),
            allowed_methods: list_or(&lookup, "ALLOWED_METHODS", DEFAULT_ALLOWED_METHODS),
            allowed_headers: list_or(&lookup, "ALLOWED_HEADERS", DEFAULT_ALLOWED_HEADERS),
            allow_credentials: flag_or(&lookup, "CORS_ALLOW_CREDENTIALS", false)?,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}
