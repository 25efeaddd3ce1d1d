use gatehouse_auth::ClaimSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct IssueTokenRequest {
    pub subject: String,
    #[serde(default)]
    pub claims: ClaimSet,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Absent when a caller-supplied `exp` was not numeric.
    pub expires_at: Option<i64>,
}
