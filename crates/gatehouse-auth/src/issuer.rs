use chrono::{DateTime, TimeDelta, Utc};
use gatehouse_config::{ClaimMergePolicy, JwtConfig, SubjectPolicy};
use jsonwebtoken::{Algorithm, Header, encode};

use crate::claims::{self, ClaimSet};
use crate::error::IssueError;
use crate::key::SigningKey;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: ClaimSet,
}

impl IssuedToken {
    pub fn expires_at(&self) -> Option<i64> {
        self.claims.expires_at()
    }
}

/// Signs HS256 tokens for a fixed key and lifetime.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: SigningKey,
    lifetime: TimeDelta,
    merge_policy: ClaimMergePolicy,
    subject_policy: SubjectPolicy,
}

impl TokenIssuer {
    pub fn new(key: SigningKey, lifetime: TimeDelta) -> Self {
        Self {
            key,
            lifetime,
            merge_policy: ClaimMergePolicy::default(),
            subject_policy: SubjectPolicy::default(),
        }
    }

    /// Fails with [`IssueError::InvalidLifetime`] when the configured lifetime
    /// is not positive or does not fit a [`TimeDelta`].
    pub fn from_config(config: &JwtConfig) -> Result<Self, IssueError> {
        let lifetime = TimeDelta::try_seconds(config.token_lifetime)
            .filter(|lifetime| *lifetime > TimeDelta::zero())
            .ok_or(IssueError::InvalidLifetime(config.token_lifetime))?;

        Ok(Self::new(SigningKey::new(config.secret.as_bytes()), lifetime)
            .with_merge_policy(config.claim_merge)
            .with_subject_policy(config.subject_policy))
    }

    pub fn with_merge_policy(mut self, policy: ClaimMergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_subject_policy(mut self, policy: SubjectPolicy) -> Self {
        self.subject_policy = policy;
        self
    }

    pub fn lifetime(&self) -> TimeDelta {
        self.lifetime
    }

    pub fn issue(&self, subject: &str, extra: ClaimSet) -> Result<IssuedToken, IssueError> {
        self.issue_at(subject, extra, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    ///
    /// `iat` is `now` and `exp` is `now + lifetime`, both in whole seconds.
    /// How `extra` interacts with those reserved claims depends on the
    /// configured [`ClaimMergePolicy`].
    pub fn issue_at(
        &self,
        subject: &str,
        extra: ClaimSet,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, IssueError> {
        if self.key.is_empty() {
            return Err(IssueError::EmptyKey);
        }

        if subject.is_empty() && self.subject_policy == SubjectPolicy::RequireNonEmpty {
            return Err(IssueError::InvalidInput(
                "subject must not be empty".to_string(),
            ));
        }

        let lifetime = self.lifetime.num_seconds();
        if lifetime <= 0 {
            return Err(IssueError::InvalidLifetime(lifetime));
        }

        // exp must stay a timestamp chrono can represent, not just a valid i64
        let issued_at = now.timestamp();
        let expires_at = issued_at
            .checked_add(lifetime)
            .filter(|exp| DateTime::from_timestamp(*exp, 0).is_some())
            .ok_or(IssueError::InvalidLifetime(lifetime))?;

        let claims = self.assemble(subject, issued_at, expires_at, extra);
        let token = encode(&Header::new(Algorithm::HS256), &claims, self.key.encoding())?;

        tracing::debug!(
            subject = %subject,
            exp = ?claims.expires_at(),
            "Issued token"
        );

        Ok(IssuedToken { token, claims })
    }

    fn assemble(&self, subject: &str, issued_at: i64, expires_at: i64, extra: ClaimSet) -> ClaimSet {
        let mut claims = ClaimSet::new()
            .with(claims::SUBJECT, subject)
            .with(claims::ISSUED_AT, issued_at)
            .with(claims::EXPIRES_AT, expires_at);

        for (name, value) in extra {
            if claims::is_reserved(&name) && self.merge_policy == ClaimMergePolicy::ReservedProtected
            {
                tracing::warn!(claim = %name, "Dropping extra claim that collides with a reserved claim");
                continue;
            }
            claims.insert(name, value);
        }

        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SigningKey::new("k1"), TimeDelta::minutes(15))
    }

    #[test]
    fn test_issue_sets_reserved_claims() {
        let now = fixed_now();
        let issued = issuer().issue_at("user-42", ClaimSet::new(), now).unwrap();

        assert_eq!(issued.claims.subject(), Some("user-42"));
        assert_eq!(issued.claims.issued_at(), Some(now.timestamp()));
        assert_eq!(issued.expires_at(), Some(now.timestamp() + 900));
    }

    #[test]
    fn test_token_header_is_hs256_jwt() {
        let issued = issuer().issue_at("user-42", ClaimSet::new(), fixed_now()).unwrap();
        let decoded = token::decode(&issued.token).unwrap();

        assert_eq!(decoded.header.alg, "HS256");
        assert_eq!(decoded.header.typ.as_deref(), Some("JWT"));
        assert_eq!(decoded.claims, issued.claims);
    }

    #[test]
    fn test_extra_claims_are_embedded() {
        let extra = ClaimSet::new()
            .with("role", "admin")
            .with("scopes", json!(["read", "write"]));
        let issued = issuer().issue_at("user-1", extra, fixed_now()).unwrap();

        let decoded = token::decode(&issued.token).unwrap();
        assert_eq!(decoded.claims.get("role"), Some(&json!("admin")));
        assert_eq!(decoded.claims.get("scopes"), Some(&json!(["read", "write"])));
    }

    #[test]
    fn test_caller_overrides_reserved_claims_by_default() {
        let extra = ClaimSet::new().with("exp", 1).with("sub", "someone-else");
        let issued = issuer().issue_at("user-1", extra, fixed_now()).unwrap();

        assert_eq!(issued.expires_at(), Some(1));
        assert_eq!(issued.claims.subject(), Some("someone-else"));
    }

    #[test]
    fn test_reserved_protected_drops_collisions() {
        let now = fixed_now();
        let extra = ClaimSet::new()
            .with("exp", 1)
            .with("iat", 2)
            .with("sub", "someone-else")
            .with("role", "admin");
        let issued = issuer()
            .with_merge_policy(ClaimMergePolicy::ReservedProtected)
            .issue_at("user-1", extra, now)
            .unwrap();

        assert_eq!(issued.claims.subject(), Some("user-1"));
        assert_eq!(issued.claims.issued_at(), Some(now.timestamp()));
        assert_eq!(issued.expires_at(), Some(now.timestamp() + 900));
        assert_eq!(issued.claims.get("role"), Some(&json!("admin")));
    }

    #[test]
    fn test_empty_subject_allowed_by_default() {
        let issued = issuer().issue_at("", ClaimSet::new(), fixed_now()).unwrap();
        assert_eq!(issued.claims.subject(), Some(""));
    }

    #[test]
    fn test_empty_subject_rejected_when_required() {
        let err = issuer()
            .with_subject_policy(SubjectPolicy::RequireNonEmpty)
            .issue_at("", ClaimSet::new(), fixed_now())
            .unwrap_err();
        assert!(matches!(err, IssueError::InvalidInput(_)));
        assert!(!err.is_signing_error());
    }

    #[test]
    fn test_empty_key_is_a_signing_error() {
        let err = TokenIssuer::new(SigningKey::new(""), TimeDelta::minutes(15))
            .issue_at("user-1", ClaimSet::new(), fixed_now())
            .unwrap_err();
        assert!(matches!(err, IssueError::EmptyKey));
        assert!(err.is_signing_error());
    }

    #[test]
    fn test_non_positive_lifetime() {
        for lifetime in [TimeDelta::zero(), TimeDelta::seconds(-5), TimeDelta::milliseconds(500)] {
            let err = TokenIssuer::new(SigningKey::new("k1"), lifetime)
                .issue_at("user-1", ClaimSet::new(), fixed_now())
                .unwrap_err();
            assert!(matches!(err, IssueError::InvalidLifetime(_)));
        }
    }

    #[test]
    fn test_overflowing_lifetime() {
        let err = TokenIssuer::new(SigningKey::new("k1"), TimeDelta::MAX)
            .issue_at("user-1", ClaimSet::new(), fixed_now())
            .unwrap_err();
        assert!(matches!(err, IssueError::InvalidLifetime(_)));
    }

    #[test]
    fn test_lifetime_past_representable_range() {
        // fits in i64 seconds but lands beyond chrono's last representable instant
        let lifetime = TimeDelta::seconds(DateTime::<Utc>::MAX_UTC.timestamp());
        let err = TokenIssuer::new(SigningKey::new("k1"), lifetime)
            .issue_at("user-1", ClaimSet::new(), fixed_now())
            .unwrap_err();
        assert!(matches!(err, IssueError::InvalidLifetime(_)));
    }

    #[test]
    fn test_from_config_rejects_unrepresentable_lifetime() {
        for lifetime in [i64::MAX, 0, -60] {
            let mut config = JwtConfig::new("k1");
            config.token_lifetime = lifetime;

            let err = TokenIssuer::from_config(&config).unwrap_err();
            assert_eq!(err.to_string(), IssueError::InvalidLifetime(lifetime).to_string());
        }
    }

    #[test]
    fn test_from_config() {
        let mut config = JwtConfig::new("k1");
        config.token_lifetime = 60;
        config.claim_merge = ClaimMergePolicy::ReservedProtected;

        let issuer = TokenIssuer::from_config(&config).unwrap();
        assert_eq!(issuer.lifetime(), TimeDelta::seconds(60));

        let issued = issuer
            .issue_at("user-1", ClaimSet::new().with("exp", 1), fixed_now())
            .unwrap();
        assert_eq!(issued.expires_at(), Some(fixed_now().timestamp() + 60));
    }

    #[test]
    fn test_same_input_same_token() {
        let now = fixed_now();
        let a = issuer().issue_at("user-1", ClaimSet::new(), now).unwrap();
        let b = issuer().issue_at("user-1", ClaimSet::new(), now).unwrap();
        assert_eq!(a.token, b.token);
    }
}
