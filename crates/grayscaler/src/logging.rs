//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem for structured logging with support for
//! both human-readable and JSON output formats.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `default_directive` - Filter directive used when RUST_LOG is unset
///   (e.g. `"info"` or `"grayscaler=debug"`).
/// * `json_format` - If true, outputs structured JSON logs; otherwise pretty-printed.
///
/// # Notes
///
/// - Log output goes to stderr
/// - The RUST_LOG environment variable overrides `default_directive`
pub fn init(default_directive: &str, json_format: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(
    config: &grayscaler_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let directive = default_directive(&config.logging.level, verbose_override);
    let json_format = json_logs_override || config.logging.format == "json";
    init(&directive, json_format);
}

/// Filter directive for a configured level; `-v` raises it to at least debug.
fn default_directive(level: &str, verbose: bool) -> String {
    let level = level.trim().to_ascii_lowercase();
    if verbose && level != "debug" && level != "trace" {
        "debug".to_string()
    } else {
        level
    }
}
