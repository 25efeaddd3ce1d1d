use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn};

/// Keeps the background log writers alive. Drop it only at process exit.
#[derive(Default)]
#[must_use = "dropping the guards stops file logging"]
pub struct LogGuards {
    #[cfg(feature = "file-logging")]
    _guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
}

/// Console, error file and JSON file logging.
///
/// Files rotate daily under `log_dir`:
/// - `gatehouse.log`: errors only, plain text
/// - `gatehouse.json`: everything at info and above, one JSON object per line
#[cfg(feature = "file-logging")]
pub fn init_tracing(log_dir: &str) -> anyhow::Result<LogGuards> {
    use anyhow::Context;
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{
        EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {log_dir}"))?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(crate::default_filter());

    let (error_writer, error_guard) = tracing_appender::non_blocking(RollingFileAppender::new(
        Rotation::DAILY,
        log_dir,
        "gatehouse.log",
    ));
    let file_layer = fmt::layer()
        .with_writer(error_writer)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    let (json_writer, json_guard) = tracing_appender::non_blocking(RollingFileAppender::new(
        Rotation::DAILY,
        log_dir,
        "gatehouse.json",
    ));
    let json_layer = fmt::layer()
        .json()
        .with_writer(json_writer)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    info!(log_dir = %log_dir, "Tracing initialized with file logging");

    Ok(LogGuards {
        _guards: vec![error_guard, json_guard],
    })
}

#[cfg(not(feature = "file-logging"))]
pub fn init_tracing(_log_dir: &str) -> anyhow::Result<LogGuards> {
    crate::init_console_logging();
    info!("File logging not compiled in, console logging only");
    Ok(LogGuards::default())
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    match status {
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Client error"
        ),
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Server error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Request completed"
        ),
    }

    response
}
