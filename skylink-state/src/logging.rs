//! Tracing setup for applications embedding the engine
//!
//! The engine emits `tracing` events at two levels: command dispatch,
//! dropped reports, and replay decisions at `debug`, channel send failures
//! and capability stream mismatches at `warn`. Embedders that already run
//! their own subscriber need nothing from this module. Everyone else picks
//! a [`LogVerbosity`] and calls [`init_logging`] once at startup.
//!
//! `RUST_LOG` takes precedence over the built-in directives, so a single
//! crate can be turned up without recompiling:
//!
//! ```text
//! RUST_LOG=skylink_state::engine=trace ./my-app
//! ```

use tracing_subscriber::EnvFilter;

/// How much engine traffic reaches stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogVerbosity {
    /// No subscriber is installed; every event is dropped
    #[default]
    Silent,
    /// Warnings plus per-camera lifecycle events, compact single-line format
    Normal,
    /// Full command and report traffic with source locations
    Verbose,
}

/// Returned when a global subscriber is already installed
#[derive(Debug, thiserror::Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct LoggingInitError(String);

/// Install a stderr subscriber for the given verbosity
///
/// Call once, before the first [`crate::Drone`] is created. Calling with
/// [`LogVerbosity::Silent`] is a no-op and always succeeds.
pub fn init_logging(verbosity: LogVerbosity) -> Result<(), LoggingInitError> {
    match verbosity {
        LogVerbosity::Silent => Ok(()),
        LogVerbosity::Normal => tracing_subscriber::fmt()
            .with_env_filter(filter_or("skylink_state=info"))
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .map_err(|e| LoggingInitError(e.to_string())),
        LogVerbosity::Verbose => tracing_subscriber::fmt()
            .with_env_filter(filter_or("skylink_state=debug,setting_store=debug"))
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .try_init()
            .map_err(|e| LoggingInitError(e.to_string())),
    }
}

/// Install a subscriber based on the `SKYLINK_LOG` environment variable
///
/// Accepts `silent`, `normal`, or `verbose`; anything else (including an
/// unset variable) means silent.
pub fn init_logging_from_env() -> Result<(), LoggingInitError> {
    let verbosity = std::env::var("SKYLINK_LOG")
        .ok()
        .as_deref()
        .map(parse_verbosity)
        .unwrap_or_default();
    init_logging(verbosity)
}

/// Whether a global subscriber has already been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

fn parse_verbosity(name: &str) -> LogVerbosity {
    match name {
        "normal" => LogVerbosity::Normal,
        "verbose" => LogVerbosity::Verbose,
        _ => LogVerbosity::Silent,
    }
}

fn filter_or(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}
