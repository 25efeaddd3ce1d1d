//! Feature modules.
//!
//! Each module follows the same layout:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers
//! - `model.rs`: Request and response DTOs
//! - `router.rs`: Axum router configuration

pub mod auth;
