//! # Gatehouse Auth
//!
//! Stateless bearer token authentication.
//!
//! [`TokenIssuer`] signs HS256 tokens carrying a subject, issue time, expiry
//! and any extra claims. [`TokenAuthorizer`] turns an `Authorization` header
//! value into a [`Decision`], checking in order:
//!
//! 1. the header is present and of the form `Bearer <token>`
//! 2. the token is a structurally valid JWS
//! 3. the algorithm is HMAC based
//! 4. the signature matches the key
//! 5. the token has not expired
//!
//! Both share a [`SigningKey`] constructed once at startup.
//!
//! ```
//! use chrono::{TimeDelta, Utc};
//! use gatehouse_auth::{ClaimSet, SigningKey, TokenAuthorizer, TokenIssuer};
//!
//! let key = SigningKey::new("k1");
//! let issuer = TokenIssuer::new(key.clone(), TimeDelta::minutes(15));
//! let authorizer = TokenAuthorizer::new(key);
//!
//! let issued = issuer.issue("user-42", ClaimSet::new()).unwrap();
//! let decision = authorizer.authorize(&format!("Bearer {}", issued.token), Utc::now());
//! assert_eq!(decision.claims().and_then(|c| c.subject()), Some("user-42"));
//! ```

pub mod authorizer;
pub mod claims;
pub mod error;
pub mod issuer;
pub mod key;
pub mod token;

pub use authorizer::{BEARER_SCHEME, Decision, TokenAuthorizer, parse_bearer};
pub use claims::ClaimSet;
pub use error::{IssueError, Rejection};
pub use issuer::{IssuedToken, TokenIssuer};
pub use key::SigningKey;

pub use gatehouse_config::{ClaimMergePolicy, ExpiryPolicy, SubjectPolicy};
