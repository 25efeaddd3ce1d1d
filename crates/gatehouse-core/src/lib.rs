//! # Gatehouse Core
//!
//! Error and response types shared by every Gatehouse crate that talks HTTP.
//!
//! - [`errors`]: [`AppError`], an HTTP status paired with an `anyhow` error
//! - [`response`]: the JSON envelopes written to clients
//!
//! Successful payloads are wrapped as `{"message": ..., "body": ...}` and
//! failures as `{"error": ..., "message": ..., "status": ...}`.
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_core::{ApiResponse, AppError};
//!
//! async fn handler() -> Result<ApiResponse<String>, AppError> {
//!     Ok(ApiResponse::ok("pong", "hello".to_string()))
//! }
//! ```

pub mod errors;
pub mod response;

pub use errors::AppError;
pub use response::{ApiError, ApiResponse};
