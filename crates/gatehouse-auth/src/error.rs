/// Why a request credential was refused.
///
/// Every variant is a request-level outcome; transports map all of them to
/// `401 Unauthorized` and tell them apart through [`Rejection::code`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Missing the Authorization header")]
    MissingCredential,

    #[error("Authorization header must be `Bearer <token>`")]
    MalformedCredential,

    #[error("Token is malformed")]
    MalformedToken,

    #[error("Unsupported signing algorithm `{0}`")]
    UnsupportedAlgorithm(String),

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token has no expiry")]
    MissingExpiry,
}

impl Rejection {
    /// Stable machine readable identifier.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::MissingCredential => "missing_credential",
            Rejection::MalformedCredential => "malformed_credential",
            Rejection::MalformedToken => "malformed_token",
            Rejection::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            Rejection::BadSignature => "bad_signature",
            Rejection::Expired => "token_expired",
            Rejection::MissingExpiry => "missing_expiry",
        }
    }
}

/// Failures while issuing a token.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("Signing key is empty")]
    EmptyKey,

    #[error("Failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Token lifetime must be positive and representable, got {0} seconds")]
    InvalidLifetime(i64),
}

impl IssueError {
    /// True for configuration faults in the signing setup rather than bad caller input.
    pub fn is_signing_error(&self) -> bool {
        matches!(self, IssueError::EmptyKey | IssueError::Signing(_))
    }
}
