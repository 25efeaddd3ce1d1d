use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose own logs follow `LOG_LEVEL`.
const GATEHOUSE_TARGETS: [&str; 5] = [
    "gatehouse",
    "gatehouse_auth",
    "gatehouse_core",
    "gatehouse_cli",
    "gatehouse_observability",
];

/// Builds the filter used by every subscriber setup.
///
/// `RUST_LOG` wins when set. Otherwise the gatehouse crates log at
/// `LOG_LEVEL` (default `info`) and noisy dependencies are held at `warn`.
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(filter_directives(&log_level))
    })
}

fn filter_directives(log_level: &str) -> String {
    let mut directives: Vec<String> = GATEHOUSE_TARGETS
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .collect();
    directives.push("tower_http=warn".to_string());
    directives.push("hyper=warn".to_string());
    directives.join(",")
}

/// Console-only logging.
///
/// Used by the CLI and as the fallback when file logging is compiled out.
/// Calling it a second time is a no-op.
pub fn init_console_logging() {
    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(default_filter());

    // A subscriber may already be installed, e.g. by a test harness.
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
