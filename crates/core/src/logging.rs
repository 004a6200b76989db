//! Logging infrastructure for the physrag assistant.
//!
//! All logs go to stderr; stdout is reserved for answers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Logging options resolved from configuration.
#[derive(Debug, Clone, Default)]
pub struct LogOptions<'a> {
    /// Filter directive override (e.g., "debug", "physrag_chat=trace")
    pub level: Option<&'a str>,

    /// Disable ANSI colors
    pub no_color: bool,

    /// Emit newline-delimited JSON records instead of human-readable lines
    pub json: bool,
}

/// Initialize the tracing subscriber with stderr output.
///
/// The filter comes from `options.level`, falling back to `RUST_LOG`, then `info`.
///
/// # Example
/// ```no_run
/// use physrag_core::logging::{init_logging, LogOptions};
///
/// init_logging(&LogOptions::default()).expect("Failed to initialize logging");
/// ```
pub fn init_logging(options: &LogOptions<'_>) -> AppResult<()> {
    let env_filter = build_filter(options.level)?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if options.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(!options.no_color && supports_color()),
            )
            .try_init()
    };

    result.map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))
}

/// Build the env filter from an explicit level or the environment.
fn build_filter(level: Option<&str>) -> AppResult<EnvFilter> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = level.unwrap_or(&default_level);

    EnvFilter::try_new(filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))
}

/// Check if the terminal supports color output.
fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}
