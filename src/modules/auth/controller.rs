use anyhow::anyhow;
use axum::{Extension, Json, extract::State};
use gatehouse_auth::{ClaimSet, IssueError};
use gatehouse_core::{ApiResponse, AppError};
use tracing::instrument;

use super::model::{IssueTokenRequest, TokenResponse};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Issue a token for an arbitrary subject. Development only.
#[instrument(skip(state, dto), fields(subject = %dto.subject))]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(dto): Json<IssueTokenRequest>,
) -> Result<ApiResponse<TokenResponse>, AppError> {
    let issued = state
        .issuer
        .issue(&dto.subject, dto.claims)
        .map_err(|e| match e {
            IssueError::InvalidInput(_) => AppError::bad_request(e),
            other => AppError::internal(other),
        })?;

    Ok(ApiResponse::created(
        "Token issued",
        TokenResponse {
            expires_at: issued.expires_at(),
            access_token: issued.token,
            token_type: "Bearer".to_string(),
        },
    ))
}

/// Claims of the caller, authorized by the axum middleware.
pub async fn me(AuthUser(claims): AuthUser) -> ApiResponse<ClaimSet> {
    ApiResponse::ok("Authenticated", claims)
}

/// Claims of the caller, authorized by the tower layer.
pub async fn claims(
    claims: Option<Extension<ClaimSet>>,
) -> Result<ApiResponse<ClaimSet>, AppError> {
    let Extension(claims) =
        claims.ok_or_else(|| AppError::internal(anyhow!("route is not behind bearer_layer")))?;
    Ok(ApiResponse::ok("Authenticated", claims))
}
