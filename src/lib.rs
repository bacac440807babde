//! libdetect - identify the cell libraries a gate-level netlist was mapped to
//!
//! The netlist is treated as opaque text. Each known library family has a
//! naming convention (a regular expression); every line of the netlist is
//! tested against every convention and the matching lines are counted per
//! library. Libraries with a non-zero count are "detected" and drive the
//! generated report and tool setup scripts.
//!
//! # Example
//!
//! ```
//! use libdetect::{Detector, LibraryRegistry};
//!
//! let detector = Detector::new(LibraryRegistry::with_defaults());
//! let result = detector.detect("INV_X1 u1 ( .A(n1), .ZN(n2) );\n");
//!
//! assert_eq!(result.counts.get("NANGATE"), Some(1));
//! assert_eq!(result.detected, vec!["NANGATE"]);
//! ```
//!
//! # Project Structure
//!
//! - [`library`]: library families and their naming patterns
//! - [`detection`]: the line scanner and match counting
//! - [`emit`]: report and setup script generation
//! - [`config`]: library path table and runtime settings

pub mod cli;
pub mod config;
pub mod detection;
pub mod emit;
pub mod library;
pub mod util;

pub use config::{ConfigError, DetectConfig, LibraryConfig, LibraryPaths, OutputLocation};
pub use detection::{DetectError, DetectionResult, Detector, MatchCounts};
pub use emit::{ArtifactEmitter, EmitError, EmitOptions, EmitOutcome, EnvUpdate};
pub use library::{LibraryDefinition, LibraryRegistry, RegistryError};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
