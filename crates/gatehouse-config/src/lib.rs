//! # Gatehouse Config
//!
//! Configuration types for the Gatehouse authentication layer.
//!
//! Every structure here is loaded from environment variables by `from_env()`.
//! The same loaders are available as `from_lookup()`, which takes any
//! `Fn(&str) -> Option<String>` so tests can feed values without touching the
//! process environment.
//!
//! - [`jwt`]: signing secret, token lifetime and validation policies
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: listen address, shutdown deadline, development endpoints
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_config::{AppConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let config = AppConfig::from_env()?;
//! ```

pub mod cors;
pub mod error;
pub mod jwt;
pub mod server;

mod lookup;

pub use cors::CorsConfig;
pub use error::ConfigError;
pub use jwt::{ClaimMergePolicy, ExpiryPolicy, JwtConfig, SubjectPolicy};
pub use server::ServerConfig;

/// Everything the service reads at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            jwt,
            cors: CorsConfig::default(),
            server: ServerConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            jwt: JwtConfig::from_lookup(&lookup)?,
            cors: CorsConfig::from_lookup(&lookup)?,
            server: ServerConfig::from_lookup(&lookup)?,
        })
    }
}
