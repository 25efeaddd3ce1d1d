use std::fmt;
use std::marker::PhantomData;
use std::ops::ControlFlow;

use axum::http::{Request, Response};
use gatehouse_auth::TokenAuthorizer;
use tower_http::validate_request::{ValidateRequest, ValidateRequestHeaderLayer};

use super::{HttpExchange, enforce};

/// tower-http validator that authorizes bearer tokens.
///
/// Works with any tower service over `http` types, hyper servers included.
/// Accepted claims are inserted as a [`gatehouse_auth::ClaimSet`] request
/// extension before the inner service runs.
pub struct BearerValidator<ResBody> {
    authorizer: TokenAuthorizer,
    _ty: PhantomData<fn() -> ResBody>,
}

impl<ResBody> BearerValidator<ResBody> {
    pub fn new(authorizer: TokenAuthorizer) -> Self {
        Self {
            authorizer,
            _ty: PhantomData,
        }
    }
}

impl<ResBody> Clone for BearerValidator<ResBody> {
    fn clone(&self) -> Self {
        Self {
            authorizer: self.authorizer.clone(),
            _ty: PhantomData,
        }
    }
}

impl<ResBody> fmt::Debug for BearerValidator<ResBody> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerValidator")
            .field("authorizer", &self.authorizer)
            .finish()
    }
}

impl<B, ResBody> ValidateRequest<B> for BearerValidator<ResBody>
where
    ResBody: From<String>,
{
    type ResponseBody = ResBody;

    fn validate(&mut self, request: &mut Request<B>) -> Result<(), Response<Self::ResponseBody>> {
        match enforce(&self.authorizer, &mut HttpExchange::from_request(request)) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(response) => Err(response),
        }
    }
}

/// Layer rejecting requests without a valid bearer token.
///
/// ```ignore
/// let service = ServiceBuilder::new()
///     .layer(bearer_layer::<Body>(authorizer))
///     .service_fn(handler);
/// ```
pub fn bearer_layer<ResBody>(
    authorizer: TokenAuthorizer,
) -> ValidateRequestHeaderLayer<BearerValidator<ResBody>>
where
    ResBody: From<String>,
{
    ValidateRequestHeaderLayer::custom(BearerValidator::new(authorizer))
}
