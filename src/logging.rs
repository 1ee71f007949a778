use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "content.log";
const DEFAULT_FILTER: &str = "stay_content=info,warn";

/// Sets up tracing for the content service: CMS fetch and request logs go to
/// stdout for the operator and to `logs/content.log.<date>` as JSON lines.
pub fn init_logging() {
    // rolling::daily expects the directory to exist
    let _ = fs::create_dir_all(LOG_DIR);

    let (file_writer, flush_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(LOG_DIR, LOG_FILE));
    let json_layer = fmt::layer().json().with_writer(file_writer);
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stdout);

    // RUST_LOG=stay_content=debug shows per-query detail
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(console_layer)
        .init();

    // Logging lives as long as the process
    std::mem::forget(flush_guard);
}
