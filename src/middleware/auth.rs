use std::ops::ControlFlow;

use axum::{
    body::Body,
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use gatehouse_auth::{ClaimSet, TokenAuthorizer};
use gatehouse_core::AppError;

use crate::transport::{HttpExchange, enforce};

/// Middleware for `axum::middleware::from_fn_with_state`.
///
/// The state only needs to yield a [`TokenAuthorizer`] through `FromRef`.
pub async fn require_bearer(
    State(authorizer): State<TokenAuthorizer>,
    mut req: Request,
    next: Next,
) -> Response {
    match enforce(&authorizer, &mut HttpExchange::<Body>::from_request(&mut req)) {
        ControlFlow::Continue(()) => next.run(req).await,
        ControlFlow::Break(response) => response,
    }
}

/// Claims of the authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub ClaimSet);

impl AuthUser {
    pub fn subject(&self) -> Option<&str> {
        self.0.subject()
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    TokenAuthorizer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already authorized by `require_bearer` or `bearer_layer`.
        if let Some(claims) = parts.extensions.get::<ClaimSet>() {
            return Ok(AuthUser(claims.clone()));
        }

        let authorizer = TokenAuthorizer::from_ref(state);
        if let ControlFlow::Break(response) =
            enforce(&authorizer, &mut HttpExchange::<Body>::from_parts(parts))
        {
            return Err(response);
        }

        parts
            .extensions
            .get::<ClaimSet>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!("claims missing after authorization"))
                    .into_response()
            })
    }
}
