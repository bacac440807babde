//! Utility modules for libdetect

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
