use std::ops::ControlFlow;

use axum::http::{Request, Response};
use gatehouse_auth::TokenAuthorizer;

use super::{HttpExchange, enforce};

/// Authorization in front of a synchronous request handler.
///
/// For thread-per-request servers. The guard is `Sync` whenever the handler
/// is, so one instance can be shared across worker threads behind an `Arc`.
pub struct BlockingGuard<H> {
    authorizer: TokenAuthorizer,
    handler: H,
}

impl<H> BlockingGuard<H> {
    pub fn new(authorizer: TokenAuthorizer, handler: H) -> Self {
        Self {
            authorizer,
            handler,
        }
    }

    /// Runs the handler if the request is authorized, otherwise returns the 401.
    pub fn handle<B, R>(&self, mut request: Request<B>) -> Response<R>
    where
        H: Fn(Request<B>) -> Response<R>,
        R: From<String>,
    {
        match enforce(&self.authorizer, &mut HttpExchange::from_request(&mut request)) {
            ControlFlow::Continue(()) => (self.handler)(request),
            ControlFlow::Break(response) => response,
        }
    }
}
