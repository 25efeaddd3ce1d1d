//! Token tooling behind the `gatehouse-cli` binary.
//!
//! Each command is a plain function returning the text to print, so the
//! binary only deals with argument parsing, prompting and exit codes.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, TimeDelta, Utc};
use gatehouse_auth::{ClaimSet, ExpiryPolicy, SigningKey, TokenAuthorizer, TokenIssuer, token};
use serde_json::{Value, json};

/// Parses a `name=value` claim argument.
///
/// The value is read as JSON when it parses (`level=3`, `admin=true`,
/// `scopes=["a","b"]`) and as a plain string otherwise.
pub fn parse_claim(raw: &str) -> Result<(String, Value)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("claim `{raw}` must look like name=value"))?;

    let name = name.trim();
    if name.is_empty() {
        bail!("claim `{raw}` has an empty name");
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

pub fn issue(
    secret: &str,
    subject: &str,
    claims: &[String],
    lifetime_secs: i64,
    now: DateTime<Utc>,
) -> Result<String> {
    let extra = claims
        .iter()
        .map(|raw| parse_claim(raw))
        .collect::<Result<ClaimSet>>()?;

    let lifetime = TimeDelta::try_seconds(lifetime_secs)
        .ok_or_else(|| anyhow!("lifetime {lifetime_secs}s is out of range"))?;

    let issued = TokenIssuer::new(SigningKey::new(secret), lifetime)
        .issue_at(subject, extra, now)
        .context("failed to issue token")?;

    Ok(issued.token)
}

/// Verifies a bare token. `Err` carries the rejection code and message.
pub fn verify(
    secret: &str,
    token: &str,
    leeway: u64,
    require_expiry: bool,
    now: DateTime<Utc>,
) -> Result<String> {
    let policy = if require_expiry {
        ExpiryPolicy::Required
    } else {
        ExpiryPolicy::Lenient
    };

    let claims = TokenAuthorizer::new(SigningKey::new(secret))
        .with_expiry_policy(policy)
        .with_leeway(leeway)
        .verify_token(token, now)
        .map_err(|rejection| anyhow!("{}: {}", rejection.code(), rejection))?;

    Ok(serde_json::to_string_pretty(&claims)?)
}

/// Decodes a token without checking its signature.
pub fn inspect(token: &str, now: DateTime<Utc>) -> Result<String> {
    let decoded = token::decode(token).map_err(|rejection| anyhow!("{rejection}"))?;

    let expiry = match decoded.claims.expires_at() {
        Some(exp) => {
            let at = DateTime::from_timestamp(exp, 0)
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| exp.to_string());
            if now.timestamp() > exp {
                format!("expired at {at}")
            } else {
                format!("expires at {at}")
            }
        }
        None => "no expiry".to_string(),
    };

    let report = json!({
        "header": {
            "alg": decoded.header.alg,
            "typ": decoded.header.typ,
            "kid": decoded.header.kid,
        },
        "claims": decoded.claims,
        "expiry": expiry,
        "signature_verified": false,
    });

    Ok(serde_json::to_string_pretty(&report)?)
}
