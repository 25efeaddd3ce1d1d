use chrono::{DateTime, Utc};
use gatehouse_config::{ExpiryPolicy, JwtConfig};

use crate::claims::ClaimSet;
use crate::error::Rejection;
use crate::key::SigningKey;
use crate::token;

pub const BEARER_SCHEME: &str = "Bearer";

/// Outcome of authorizing one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Accept(ClaimSet),
    Reject(Rejection),
}

impl Decision {
    pub fn is_accept(&self) -> bool {
        matches!(self, Decision::Accept(_))
    }

    pub fn claims(&self) -> Option<&ClaimSet> {
        match self {
            Decision::Accept(claims) => Some(claims),
            Decision::Reject(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Decision::Accept(_) => None,
            Decision::Reject(rejection) => Some(rejection),
        }
    }

    pub fn into_result(self) -> Result<ClaimSet, Rejection> {
        self.into()
    }
}

impl From<Result<ClaimSet, Rejection>> for Decision {
    fn from(result: Result<ClaimSet, Rejection>) -> Self {
        match result {
            Ok(claims) => Decision::Accept(claims),
            Err(rejection) => Decision::Reject(rejection),
        }
    }
}

impl From<Decision> for Result<ClaimSet, Rejection> {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Accept(claims) => Ok(claims),
            Decision::Reject(rejection) => Err(rejection),
        }
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// The value must be exactly `Bearer <token>`: one space, the scheme first,
/// compared case-sensitively.
pub fn parse_bearer(header_value: &str) -> Result<&str, Rejection> {
    if header_value.is_empty() {
        return Err(Rejection::MissingCredential);
    }

    let mut parts = header_value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) => Ok(token),
        _ => Err(Rejection::MalformedCredential),
    }
}

/// Validates bearer tokens signed with an HMAC key.
///
/// Checks run in a fixed order and stop at the first failure: credential
/// shape, token structure, algorithm, signature, expiry. The authorizer holds
/// no mutable state and can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct TokenAuthorizer {
    key: SigningKey,
    expiry_policy: ExpiryPolicy,
    leeway: u64,
}

impl TokenAuthorizer {
    pub fn new(key: SigningKey) -> Self {
        Self {
            key,
            expiry_policy: ExpiryPolicy::default(),
            leeway: 0,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(SigningKey::new(config.secret.as_bytes()))
            .with_expiry_policy(config.expiry_policy)
            .with_leeway(config.leeway)
    }

    pub fn with_expiry_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.expiry_policy = policy;
        self
    }

    /// Seconds of clock skew tolerated past `exp`.
    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn authorize_now(&self, header_value: &str) -> Decision {
        self.authorize(header_value, Utc::now())
    }

    pub fn authorize(&self, header_value: &str, now: DateTime<Utc>) -> Decision {
        let result = parse_bearer(header_value).and_then(|token| self.verify_token(token, now));

        match &result {
            Ok(claims) => tracing::debug!(subject = ?claims.subject(), "Token accepted"),
            Err(rejection) => tracing::debug!(reason = rejection.code(), "Token rejected"),
        }

        result.into()
    }

    /// Verifies a bare token, skipping the `Authorization` header parsing.
    pub fn verify_token(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, Rejection> {
        let decoded = token::decode(token)?;

        let algorithm = decoded
            .header
            .hmac_algorithm()
            .ok_or_else(|| Rejection::UnsupportedAlgorithm(decoded.header.alg.clone()))?;

        // anyone can compute an HMAC under an empty secret
        if self.key.is_empty() {
            return Err(Rejection::BadSignature);
        }

        let valid = jsonwebtoken::crypto::verify(
            decoded.signature(),
            decoded.signing_input().as_bytes(),
            self.key.decoding(),
            algorithm,
        )
        .map_err(|_| Rejection::BadSignature)?;
        if !valid {
            return Err(Rejection::BadSignature);
        }

        self.check_expiry(&decoded.claims, now)?;

        Ok(decoded.claims)
    }

    fn check_expiry(&self, claims: &ClaimSet, now: DateTime<Utc>) -> Result<(), Rejection> {
        let Some(expires_at) = claims.expires_at() else {
            return match self.expiry_policy {
                ExpiryPolicy::Lenient => Ok(()),
                ExpiryPolicy::Required => Err(Rejection::MissingExpiry),
            };
        };

        let leeway = i64::try_from(self.leeway).unwrap_or(i64::MAX);
        if now.timestamp() > expires_at.saturating_add(leeway) {
            return Err(Rejection::Expired);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::TokenIssuer;
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use chrono::{TimeDelta, TimeZone};
    use jsonwebtoken::{Algorithm, EncodingKey};
    use serde_json::{Value, json};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn authorizer(secret: &str) -> TokenAuthorizer {
        TokenAuthorizer::new(SigningKey::new(secret))
    }

    fn issue(secret: &str, subject: &str, now: DateTime<Utc>) -> String {
        TokenIssuer::new(SigningKey::new(secret), TimeDelta::minutes(15))
            .issue_at(subject, ClaimSet::new(), now)
            .unwrap()
            .token
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Hand-built token so tests control the header and payload exactly.
    fn signed_token(header: &Value, payload: &Value, secret: &str, alg: Algorithm) -> String {
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(header).unwrap()),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap())
        );
        let signature = jsonwebtoken::crypto::sign(
            signing_input.as_bytes(),
            &EncodingKey::from_secret(secret.as_bytes()),
            alg,
        )
        .unwrap();
        format!("{signing_input}.{signature}")
    }

    #[test]
    fn test_user_42_lifecycle() {
        let now = fixed_now();
        let token = issue("k1", "user-42", now);

        let accepted = authorizer("k1").authorize(&bearer(&token), now);
        assert_eq!(accepted.claims().and_then(ClaimSet::subject), Some("user-42"));

        let wrong_key = authorizer("k2").authorize(&bearer(&token), now);
        assert_eq!(wrong_key, Decision::Reject(Rejection::BadSignature));

        let later = authorizer("k1").authorize(&bearer(&token), now + TimeDelta::minutes(16));
        assert_eq!(later, Decision::Reject(Rejection::Expired));
    }

    #[test]
    fn test_valid_until_exp_inclusive() {
        let now = fixed_now();
        let token = issue("k1", "user-1", now);
        let exp = now + TimeDelta::minutes(15);

        assert!(authorizer("k1").authorize(&bearer(&token), exp).is_accept());
        assert_eq!(
            authorizer("k1").authorize(&bearer(&token), exp + TimeDelta::seconds(1)),
            Decision::Reject(Rejection::Expired)
        );
    }

    #[test]
    fn test_leeway_extends_expiry() {
        let now = fixed_now();
        let token = issue("k1", "user-1", now);
        let after_exp = now + TimeDelta::minutes(15) + TimeDelta::seconds(30);

        let strict = authorizer("k1");
        assert_eq!(
            strict.authorize(&bearer(&token), after_exp),
            Decision::Reject(Rejection::Expired)
        );

        let tolerant = authorizer("k1").with_leeway(30);
        assert!(tolerant.authorize(&bearer(&token), after_exp).is_accept());
        assert_eq!(
            tolerant.authorize(&bearer(&token), after_exp + TimeDelta::seconds(1)),
            Decision::Reject(Rejection::Expired)
        );
    }

    #[test]
    fn test_empty_header_is_missing_credential() {
        assert_eq!(
            authorizer("k1").authorize("", fixed_now()),
            Decision::Reject(Rejection::MissingCredential)
        );
    }

    #[test]
    fn test_malformed_credentials() {
        let token = issue("k1", "user-1", fixed_now());
        for value in [
            token.clone(),
            format!("Basic {token}"),
            format!("bearer {token}"),
            format!("Bearer  {token}"),
            format!("Bearer {token} extra"),
            format!("{token} Bearer"),
            "Bearer".to_string(),
            " ".to_string(),
        ] {
            assert_eq!(
                authorizer("k1").authorize(&value, fixed_now()),
                Decision::Reject(Rejection::MalformedCredential),
                "header {value:?}"
            );
        }
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc"), Ok("abc"));
        assert_eq!(parse_bearer("Bearer "), Ok(""));
        assert_eq!(parse_bearer(""), Err(Rejection::MissingCredential));
        assert_eq!(parse_bearer("Token abc"), Err(Rejection::MalformedCredential));
    }

    #[test]
    fn test_empty_token_is_malformed_token() {
        assert_eq!(
            authorizer("k1").authorize("Bearer ", fixed_now()),
            Decision::Reject(Rejection::MalformedToken)
        );
    }

    #[test]
    fn test_garbage_token() {
        assert_eq!(
            authorizer("k1").authorize("Bearer not-a-jwt", fixed_now()),
            Decision::Reject(Rejection::MalformedToken)
        );
    }

    #[test]
    fn test_rs256_header_is_unsupported() {
        let payload = json!({"sub": "user-1"});
        let header = json!({"alg": "RS256", "typ": "JWT"});
        let token = format!(
            "{}.{}.c2ln",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap()),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap())
        );

        assert_eq!(
            authorizer("k1").authorize(&bearer(&token), fixed_now()),
            Decision::Reject(Rejection::UnsupportedAlgorithm("RS256".to_string()))
        );
    }

    #[test]
    fn test_alg_none_is_unsupported() {
        let header = json!({"alg": "none"});
        let payload = json!({"sub": "admin"});
        let token = format!(
            "{}.{}.",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap()),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap())
        );

        assert_eq!(
            authorizer("k1").authorize(&bearer(&token), fixed_now()),
            Decision::Reject(Rejection::UnsupportedAlgorithm("none".to_string()))
        );
    }

    #[test]
    fn test_algorithm_checked_before_signature() {
        // Signed with the right key, but the header claims an asymmetric algorithm.
        let token = signed_token(
            &json!({"alg": "ES256"}),
            &json!({"sub": "user-1"}),
            "k1",
            Algorithm::HS256,
        );
        assert_eq!(
            authorizer("k1").authorize(&bearer(&token), fixed_now()),
            Decision::Reject(Rejection::UnsupportedAlgorithm("ES256".to_string()))
        );
    }

    #[test]
    fn test_hs384_and_hs512_are_accepted() {
        for (name, alg) in [("HS384", Algorithm::HS384), ("HS512", Algorithm::HS512)] {
            let token = signed_token(
                &json!({"alg": name, "typ": "JWT"}),
                &json!({"sub": "user-1", "exp": fixed_now().timestamp() + 60}),
                "k1",
                alg,
            );
            assert!(
                authorizer("k1").authorize(&bearer(&token), fixed_now()).is_accept(),
                "alg {name}"
            );
        }
    }

    #[test]
    fn test_signature_is_checked_before_expiry() {
        let now = fixed_now();
        let token = issue("k1", "user-1", now);
        assert_eq!(
            authorizer("k2").authorize(&bearer(&token), now + TimeDelta::days(1)),
            Decision::Reject(Rejection::BadSignature)
        );
    }

    #[test]
    fn test_empty_key_rejects_empty_key_signature() {
        let now = fixed_now();
        let payload = json!({"sub": "admin", "exp": now.timestamp() + 60});

        for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            let header = json!({"alg": format!("{alg:?}"), "typ": "JWT"});
            let token = signed_token(&header, &payload, "", alg);

            let decision = authorizer("").authorize(&bearer(&token), now);
            assert_eq!(decision, Decision::Reject(Rejection::BadSignature), "{alg:?}");
        }
    }

    #[test]
    fn test_empty_key_still_reports_earlier_rejections() {
        let empty = authorizer("");
        assert_eq!(
            empty.authorize("", fixed_now()),
            Decision::Reject(Rejection::MissingCredential)
        );
        assert_eq!(
            empty.authorize("Bearer not.a.token", fixed_now()),
            Decision::Reject(Rejection::MalformedToken)
        );
    }

    #[test]
    fn test_tampered_payload_fails_signature() {
        let now = fixed_now();
        let token = issue("k1", "user-1", now);
        let mut segments: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&json!({"sub": "admin", "exp": now.timestamp() + 900})).unwrap(),
        );
        segments[1] = &forged;

        assert_eq!(
            authorizer("k1").authorize(&bearer(&segments.join(".")), now),
            Decision::Reject(Rejection::BadSignature)
        );
    }

    #[test]
    fn test_missing_expiry_is_lenient_by_default() {
        let token = signed_token(
            &json!({"alg": "HS256"}),
            &json!({"sub": "user-1"}),
            "k1",
            Algorithm::HS256,
        );
        let far_future = fixed_now() + TimeDelta::days(365 * 50);
        assert!(authorizer("k1").authorize(&bearer(&token), far_future).is_accept());
    }

    #[test]
    fn test_non_numeric_expiry_is_lenient_by_default() {
        let token = signed_token(
            &json!({"alg": "HS256"}),
            &json!({"sub": "user-1", "exp": "never"}),
            "k1",
            Algorithm::HS256,
        );
        assert!(authorizer("k1").authorize(&bearer(&token), fixed_now()).is_accept());
    }

    #[test]
    fn test_missing_expiry_rejected_when_required() {
        let token = signed_token(
            &json!({"alg": "HS256"}),
            &json!({"sub": "user-1"}),
            "k1",
            Algorithm::HS256,
        );
        let strict = authorizer("k1").with_expiry_policy(ExpiryPolicy::Required);
        assert_eq!(
            strict.authorize(&bearer(&token), fixed_now()),
            Decision::Reject(Rejection::MissingExpiry)
        );
    }

    #[test]
    fn test_fractional_expiry() {
        let now = fixed_now();
        let token = signed_token(
            &json!({"alg": "HS256"}),
            &json!({"sub": "user-1", "exp": now.timestamp() as f64 + 0.5}),
            "k1",
            Algorithm::HS256,
        );
        assert!(authorizer("k1").authorize(&bearer(&token), now).is_accept());
        assert_eq!(
            authorizer("k1").authorize(&bearer(&token), now + TimeDelta::seconds(1)),
            Decision::Reject(Rejection::Expired)
        );
    }

    #[test]
    fn test_extra_claims_survive_verification() {
        let now = fixed_now();
        let issued = TokenIssuer::new(SigningKey::new("k1"), TimeDelta::minutes(15))
            .issue_at("user-1", ClaimSet::new().with("role", "admin"), now)
            .unwrap();

        let claims = authorizer("k1")
            .verify_token(&issued.token, now)
            .unwrap();
        assert_eq!(claims.get("role"), Some(&json!("admin")));
        assert_eq!(claims, issued.claims);
    }

    #[test]
    fn test_from_config() {
        let mut config = JwtConfig::new("k1");
        config.leeway = 120;
        config.expiry_policy = ExpiryPolicy::Required;

        let now = fixed_now();
        let token = issue("k1", "user-1", now);
        let authorizer = TokenAuthorizer::from_config(&config);

        let just_expired = now + TimeDelta::minutes(16);
        assert!(authorizer.authorize(&bearer(&token), just_expired).is_accept());
    }

    #[test]
    fn test_decision_conversions() {
        let accept = Decision::Accept(ClaimSet::new().with("sub", "x"));
        assert!(accept.rejection().is_none());
        assert_eq!(accept.into_result().unwrap().subject(), Some("x"));

        let reject = Decision::from(Err(Rejection::Expired));
        assert!(!reject.is_accept());
        assert_eq!(reject.into_result().unwrap_err(), Rejection::Expired);
    }
}
