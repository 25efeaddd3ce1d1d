//! Gatehouse Observability
//!
//! Logging setup and HTTP request logging:
//! - [`init_console_logging`]: compact console output filtered by `LOG_LEVEL`/`RUST_LOG`
//! - [`init_tracing`]: console plus daily rolling error and JSON log files
//! - [`logging_middleware`]: one structured log line per request with latency
//!
//! # Features
//!
//! - `file-logging` (default): enables the rolling file layers of [`init_tracing`].
//!   Without it [`init_tracing`] falls back to console logging.
//!
//! ```no_run
//! use gatehouse_observability::init_tracing;
//!
//! let _guards = init_tracing("storage/logs").expect("logging");
//! tracing::info!("ready");
//! ```

pub mod basic_logging;
pub mod logging;

pub use basic_logging::{default_filter, init_console_logging};
pub use logging::{LogGuards, init_tracing, logging_middleware};
