use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Parses a configured level name into a filter.
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(format!(
            "Invalid logging.level '{}'. Valid values: trace, debug, info, warn, error",
            level
        )),
    }
}

/// Installs the global subscriber. Must be called once, before the server starts.
pub fn init_logging(logging_config: &LoggingConfig) -> Result<(), String> {
    let level_filter = parse_level(&logging_config.level)?;

    // RUST_LOG directives still apply on top of the configured default.
    let filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .from_env_lossy();

    match logging_config.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter_layer)
                .with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(true)
                        .with_span_list(false),
                )
                .try_init()
                .map_err(|e| e.to_string())?;
        }
        _ => {
            // console, and anything we don't recognise
            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt::layer().pretty())
                .try_init()
                .map_err(|e| e.to_string())?;
        }
    }

    tracing::info!(
        service_name = %logging_config.service_name,
        service_version = %logging_config.service_version,
        "Logging initialised"
    );
    Ok(())
}
