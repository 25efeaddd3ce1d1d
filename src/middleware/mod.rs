//! Axum bindings for bearer authentication.
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. [`auth::require_bearer`] authorizes it and stores the claims on the request,
//!    or answers 401 itself
//! 3. Handlers read the claims through the [`auth::AuthUser`] extractor
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::get};
//! use gatehouse::middleware::auth::{AuthUser, require_bearer};
//!
//! async fn me(AuthUser(claims): AuthUser) -> String {
//!     claims.subject().unwrap_or_default().to_string()
//! }
//!
//! let protected = Router::new()
//!     .route("/me", get(me))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));
//! ```
//!
//! `AuthUser` also works without the middleware: it then authorizes the
//! header on its own.

pub mod auth;
