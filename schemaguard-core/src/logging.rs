//! Logging setup for the SchemaGuard binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the application.

use tracing_subscriber::EnvFilter;

use crate::Result;
use crate::error::SchemaGuardError;

/// Maps CLI verbosity flags to a maximum log level.
///
/// `quiet` wins over any verbosity: 0=INFO, 1=DEBUG, 2+=TRACE.
pub fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Filter directives for the subscriber.
///
/// A non-blank `RUST_LOG` value is used as-is unless `quiet` is set; otherwise
/// the level comes from the CLI flags.
pub fn filter_directives(verbose: u8, quiet: bool, from_env: Option<&str>) -> String {
    match from_env {
        Some(directives) if !quiet && !directives.trim().is_empty() => directives.to_string(),
        _ => level_for(verbose, quiet).as_str().to_lowercase(),
    }
}

/// Initializes structured logging on stderr based on verbosity level.
///
/// Logs go to stderr so that reports written to stdout stay machine-readable.
///
/// # Errors
/// Returns a configuration error if `RUST_LOG` cannot be parsed or a global
/// subscriber is already set.
///
/// # Example
/// ```rust,no_run
/// use schemaguard_core::logging::init_logging;
///
/// // Initialize at DEBUG level
/// init_logging(1, false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::try_new(filter_directives(verbose, quiet, from_env.as_deref()))
        .map_err(|e| SchemaGuardError::configuration(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| {
            SchemaGuardError::configuration(format!(
                "Failed to initialize logging: {}",
                e
            ))
        })?;

    Ok(())
}
