//! Structured logging setup for libdetect
//!
//! Logging goes through the `tracing` ecosystem and is written to stderr so
//! that stdout stays free for the detection summary.
//!
//! # Example
//!
//! ```no_run
//! use libdetect::util::logging::{self, LoggingConfig};
//!
//! logging::init_logging(LoggingConfig::default());
//!
//! use tracing::{info, warn};
//! info!("Scanning netlist");
//! warn!(library = "RAK", "No library path configured");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., libdetect::emit) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Debug level with targets, for `--verbose`
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

pub const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Parses a log level, case-insensitively. Returns `None` for anything
/// outside [`VALID_LEVELS`].
///
/// # Example
///
/// ```
/// use libdetect::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Some(Level::DEBUG));
/// assert_eq!(parse_level("INFO"), Some(Level::INFO));
/// assert_eq!(parse_level("invalid"), None);
/// ```
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            if let Ok(directive) = format!("libdetect={}", config.level).parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
