//! # Gatehouse
//!
//! Stateless bearer token authentication for HTTP services.
//!
//! Tokens are issued and verified by [`gatehouse_auth`]; this crate puts the
//! authorizer in front of request handlers, whatever serves them:
//!
//! - **axum**: [`middleware::auth::require_bearer`] and the
//!   [`middleware::auth::AuthUser`] extractor
//! - **tower / hyper**: [`transport::bearer_layer`]
//! - **blocking servers**: [`transport::BlockingGuard`]
//!
//! All three go through [`transport::enforce`], so every transport accepts
//! and rejects exactly the same requests. Rejections are always
//! `401 Unauthorized` with a JSON body:
//!
//! ```json
//! { "error": "token_expired", "message": "Token has expired", "status": 401 }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # axum middleware and extractor
//! ├── modules/          # Feature modules
//! │   └── auth/        # token endpoint, identity routes
//! ├── transport/        # AuthTransport, enforce, tower layer, blocking guard
//! ├── router.rs         # Main router and CORS
//! ├── shutdown.rs       # Graceful shutdown coordinator
//! └── state.rs          # Shared application state
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! JWT_SECRET=change-me TOKEN_ENDPOINT_ENABLED=true cargo run
//! curl -X POST localhost:3000/api/auth/token -H 'content-type: application/json' \
//!      -d '{"subject": "user-42"}'
//! curl localhost:3000/api/me -H "Authorization: Bearer $TOKEN"
//! ```
//!
//! ## Security Considerations
//!
//! - Only HMAC algorithms are accepted; `none` and asymmetric algorithms are rejected
//! - Tokens without `exp` never expire unless `JWT_EXPIRY_POLICY=required`
//! - Callers can override `sub`/`iat`/`exp` at issue time unless
//!   `JWT_CLAIM_MERGE=reserved_protected`
//! - The token endpoint signs any subject and is for development only

pub mod middleware;
pub mod modules;
pub mod router;
pub mod shutdown;
pub mod state;
pub mod transport;

// Re-export workspace crates for convenience
pub use gatehouse_auth;
pub use gatehouse_config;
pub use gatehouse_core;
