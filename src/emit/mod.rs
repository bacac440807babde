//! Report and tool setup script generation

pub mod emitter;
pub mod templates;

pub use emitter::{ArtifactEmitter, EmitError, EmitOptions, EmitOutcome, EnvUpdate, LIB_USED_VAR};
