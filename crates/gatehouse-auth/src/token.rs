//! Structural decoding of compact JWS tokens.
//!
//! Decoding only checks shape: three base64url segments, a JSON header with an
//! `alg`, and a JSON object payload. Algorithm, signature and expiry checks
//! happen in the authorizer, in that order.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::claims::ClaimSet;
use crate::error::Rejection;

/// Algorithms accepted on verification. Anything else, `none` included, is refused.
pub const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    #[serde(default)]
    pub typ: Option<String>,
    #[serde(default)]
    pub kid: Option<String>,
}

impl TokenHeader {
    /// The HMAC algorithm named by `alg`, if it is one.
    pub fn hmac_algorithm(&self) -> Option<Algorithm> {
        self.alg
            .parse::<Algorithm>()
            .ok()
            .filter(|alg| HMAC_ALGORITHMS.contains(alg))
    }
}

/// A structurally valid but unverified token.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    pub header: TokenHeader,
    pub claims: ClaimSet,
    signing_input: String,
    signature: String,
}

impl DecodedToken {
    /// `header.payload`, the bytes covered by the signature.
    pub fn signing_input(&self) -> &str {
        &self.signing_input
    }

    /// Base64url signature segment as it appeared on the wire.
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

pub fn decode(token: &str) -> Result<DecodedToken, Rejection> {
    let mut segments = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(Rejection::MalformedToken);
    };

    let header: TokenHeader = decode_json(header_b64)?;
    let payload: Map<String, Value> = decode_json(payload_b64)?;

    // Only the encoding is checked here; the bytes are compared during verification.
    URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| Rejection::MalformedToken)?;

    Ok(DecodedToken {
        header,
        claims: ClaimSet::from(payload),
        signing_input: format!("{header_b64}.{payload_b64}"),
        signature: signature_b64.to_string(),
    })
}

fn decode_json<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, Rejection> {
    if segment.is_empty() {
        return Err(Rejection::MalformedToken);
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| Rejection::MalformedToken)?;
    serde_json::from_slice(&bytes).map_err(|_| Rejection::MalformedToken)
}
