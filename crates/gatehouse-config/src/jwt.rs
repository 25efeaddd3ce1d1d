//! JWT signing configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: shared HMAC secret (required, must not be empty)
//! - `JWT_TOKEN_LIFETIME`: token lifetime in seconds (default: 900)
//! - `JWT_LEEWAY`: seconds of clock skew tolerated on `exp` (default: 0)
//! - `JWT_CLAIM_MERGE`: `caller_overrides` (default) or `reserved_protected`
//! - `JWT_EXPIRY_POLICY`: `lenient` (default) or `required`
//! - `JWT_REQUIRE_SUBJECT`: reject empty subjects at issue time (default: false)

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::lookup::{flag_or, parse_or};

/// Default token lifetime: 15 minutes.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 900;

/// How caller supplied claims interact with the reserved `sub`/`iat`/`exp` claims.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClaimMergePolicy {
    /// Extra claims are merged last and win on collision.
    #[default]
    CallerOverrides,
    /// Colliding extra claims are dropped.
    ReservedProtected,
}

impl FromStr for ClaimMergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "caller_overrides" => Ok(Self::CallerOverrides),
            "reserved_protected" => Ok(Self::ReservedProtected),
            other => Err(format!(
                "unknown claim merge policy `{other}`, expected caller_overrides or reserved_protected"
            )),
        }
    }
}

impl fmt::Display for ClaimMergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CallerOverrides => "caller_overrides",
            Self::ReservedProtected => "reserved_protected",
        })
    }
}

/// Treatment of tokens whose `exp` claim is absent or not numeric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Such tokens never expire.
    #[default]
    Lenient,
    /// Such tokens are rejected.
    Required,
}

impl FromStr for ExpiryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "required" => Ok(Self::Required),
            other => Err(format!(
                "unknown expiry policy `{other}`, expected lenient or required"
            )),
        }
    }
}

/// Whether the issuer accepts an empty subject.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubjectPolicy {
    #[default]
    AllowEmpty,
    RequireNonEmpty,
}

#[derive(Clone, PartialEq, Eq)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub token_lifetime: i64,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway: u64,
    pub claim_merge: ClaimMergePolicy,
    pub expiry_policy: ExpiryPolicy,
    pub subject_policy: SubjectPolicy,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .field("leeway", &self.leeway)
            .field("claim_merge", &self.claim_merge)
            .field("expiry_policy", &self.expiry_policy)
            .field("subject_policy", &self.subject_policy)
            .finish()
    }
}

impl JwtConfig {
    /// Configuration with default policies for the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME_SECS,
            leeway: 0,
            claim_merge: ClaimMergePolicy::default(),
            expiry_policy: ExpiryPolicy::default(),
            subject_policy: SubjectPolicy::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_lifetime = parse_or(&lookup, "JWT_TOKEN_LIFETIME", DEFAULT_TOKEN_LIFETIME_SECS)?;
        if token_lifetime <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_TOKEN_LIFETIME",
                value: token_lifetime.to_string(),
                reason: "lifetime must be positive".to_string(),
            });
        }

        let subject_policy = if flag_or(&lookup, "JWT_REQUIRE_SUBJECT", false)? {
            SubjectPolicy::RequireNonEmpty
        } else {
            SubjectPolicy::AllowEmpty
        };

        Ok(Self {
            secret,
            token_lifetime,
            leeway: parse_or(&lookup, "JWT_LEEWAY", 0)?,
            claim_merge: parse_or(&lookup, "JWT_CLAIM_MERGE", ClaimMergePolicy::default())?,
            expiry_policy: parse_or(&lookup, "JWT_EXPIRY_POLICY", ExpiryPolicy::default())?,
            subject_policy,
        })
    }
}
