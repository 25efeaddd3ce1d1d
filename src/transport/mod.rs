//! Transport bindings for the token authorizer.
//!
//! Every server flavour enters the same decision through [`enforce`]; a
//! binding only has to say how to read the `Authorization` header, where to
//! put accepted claims and how to turn a rejection into a response.
//!
//! - [`crate::middleware::auth`]: axum middleware and extractor
//! - [`layer`]: tower layer for any tower/hyper service
//! - [`blocking`]: guard around a synchronous handler

pub mod blocking;
pub mod layer;

use std::borrow::Cow;
use std::marker::PhantomData;
use std::ops::ControlFlow;

use axum::http::{
    Extensions, HeaderValue, Request, Response, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE},
    request::Parts,
};
use chrono::{DateTime, Utc};
use gatehouse_auth::{ClaimSet, Decision, Rejection, TokenAuthorizer};
use gatehouse_core::ApiError;

pub use blocking::BlockingGuard;
pub use layer::{BearerValidator, bearer_layer};

/// What a transport must provide for a request to be authorized.
pub trait AuthTransport {
    type Response;

    /// Raw `Authorization` header value, `None` when absent.
    fn authorization(&self) -> Option<Cow<'_, str>>;

    /// Makes accepted claims visible to the downstream handler.
    fn attach_claims(&mut self, claims: ClaimSet);

    fn reject(&self, rejection: &Rejection) -> Self::Response;
}

/// Authorizes the request carried by `transport` against the wall clock.
///
/// `Continue` means the claims are attached and the request should be
/// forwarded; `Break` carries the response to send instead.
pub fn enforce<T: AuthTransport>(
    authorizer: &TokenAuthorizer,
    transport: &mut T,
) -> ControlFlow<T::Response> {
    enforce_at(authorizer, transport, Utc::now())
}

pub fn enforce_at<T: AuthTransport>(
    authorizer: &TokenAuthorizer,
    transport: &mut T,
    now: DateTime<Utc>,
) -> ControlFlow<T::Response> {
    let decision = {
        let header = transport.authorization();
        authorizer.authorize(header.as_deref().unwrap_or_default(), now)
    };

    match decision {
        Decision::Accept(claims) => {
            transport.attach_claims(claims);
            ControlFlow::Continue(())
        }
        Decision::Reject(rejection) => ControlFlow::Break(transport.reject(&rejection)),
    }
}

/// [`AuthTransport`] over an `http` request.
///
/// The header is copied out up front so the request extensions can be
/// borrowed mutably for the claims. `R` is the body type of the rejection
/// response.
pub struct HttpExchange<'a, R> {
    authorization: Option<String>,
    extensions: &'a mut Extensions,
    _body: PhantomData<fn() -> R>,
}

impl<'a, R> HttpExchange<'a, R> {
    pub fn from_request<B>(request: &'a mut Request<B>) -> Self {
        let authorization = header_string(request.headers().get(AUTHORIZATION));
        Self {
            authorization,
            extensions: request.extensions_mut(),
            _body: PhantomData,
        }
    }

    pub fn from_parts(parts: &'a mut Parts) -> Self {
        Self {
            authorization: header_string(parts.headers.get(AUTHORIZATION)),
            extensions: &mut parts.extensions,
            _body: PhantomData,
        }
    }
}

// Non UTF-8 bytes become replacement characters and fail later as malformed.
fn header_string(value: Option<&HeaderValue>) -> Option<String> {
    value.map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

impl<R: From<String>> AuthTransport for HttpExchange<'_, R> {
    type Response = Response<R>;

    fn authorization(&self) -> Option<Cow<'_, str>> {
        self.authorization.as_deref().map(Cow::Borrowed)
    }

    fn attach_claims(&mut self, claims: ClaimSet) {
        self.extensions.insert(claims);
    }

    fn reject(&self, rejection: &Rejection) -> Self::Response {
        rejection_response(rejection)
    }
}

/// `WWW-Authenticate` challenge for a rejection.
pub fn challenge(rejection: &Rejection) -> &'static str {
    match rejection {
        Rejection::MissingCredential => "Bearer",
        Rejection::MalformedCredential => r#"Bearer error="invalid_request""#,
        _ => r#"Bearer error="invalid_token""#,
    }
}

/// 401 response with a JSON error body, shared by every binding.
pub fn rejection_response<R: From<String>>(rejection: &Rejection) -> Response<R> {
    let body = ApiError::new(
        StatusCode::UNAUTHORIZED,
        rejection.code(),
        rejection.to_string(),
    )
    .to_json();

    let mut response = Response::new(R::from(body));
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    let headers = response.headers_mut();
    headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static(challenge(rejection)));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
