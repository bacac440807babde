//! Netlist scanning and per-library match counting

pub mod detector;
pub mod types;

pub use detector::{DetectError, Detector, EXCLUSION_MARKER};
pub use types::{DetectionResult, MatchCounts};
