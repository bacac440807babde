//! Configuration management for libdetect
//!
//! Two kinds of configuration feed a run:
//!
//! - **Library file** (TOML): the library identifier to liberty path table,
//!   optional extra library families, and output defaults.
//! - **Runtime settings** ([`DetectConfig`]): loaded from `LIBDETECT_*`
//!   environment variables with defaults, then overridden by the library
//!   file's `[output]` table and finally by command-line flags.
//!
//! # Environment Variables
//!
//! - `LIBDETECT_CONFIG`: Path to the library file
//! - `LIBDETECT_LOG_LEVEL`: Logging level - default: "info"
//! - `LIBDETECT_OUTPUT_LOCATION`: Where artifacts go (netlist|cwd) - default: "netlist"
//! - `LIBDETECT_PER_LIBRARY`: Also write per-library scripts (true|false) - default: "false"
//!
//! # Library file
//!
//! ```toml
//! [paths]
//! RAK = "/pdk/rak/liberty/rak_tt_1p0v_25c.lib"
//! NANGATE = "/pdk/nangate45/NangateOpenCellLibrary_typical.lib"
//!
//! [[library]]
//! name = "GF180"
//! pattern = '\bgf180mcu_\w+\b'
//! path = "/pdk/gf180/tt.lib"
//!
//! [output]
//! location = "cwd"
//! per_library = true
//! ```

use crate::library::{LibraryDefinition, LibraryRegistry, RegistryError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PER_LIBRARY: bool = false;
const LOCAL_CONFIG_FILE: &str = "libdetect.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid naming pattern for library {name}: {message}")]
    InvalidPattern { name: String, message: String },

    #[error("Invalid library name '{0}': use only letters, digits and '_'")]
    InvalidLibraryName(String),

    #[error("Library defined more than once: {0}")]
    DuplicateLibrary(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

impl From<RegistryError> for ConfigError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidPattern { name, message } => {
                ConfigError::InvalidPattern { name, message }
            }
            RegistryError::InvalidName(name) => ConfigError::InvalidLibraryName(name),
            RegistryError::DuplicateLibrary(name) => ConfigError::DuplicateLibrary(name),
        }
    }
}

/// Directory that receives generated artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLocation {
    /// Directory containing the netlist
    Netlist,
    /// Current working directory
    Cwd,
}

impl FromStr for OutputLocation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "netlist" => Ok(OutputLocation::Netlist),
            "cwd" => Ok(OutputLocation::Cwd),
            other => Err(ConfigError::ValidationFailed(format!(
                "Invalid output location: {}. Valid options: netlist, cwd",
                other
            ))),
        }
    }
}

/// Library identifier to liberty file path.
///
/// A library with no entry, or an entry that is blank, is unconfigured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryPaths {
    paths: BTreeMap<String, PathBuf>,
}

impl LibraryPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, library: impl Into<String>, path: impl Into<PathBuf>) {
        let path = path.into();
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return;
        }
        self.paths.insert(library.into(), path);
    }

    pub fn get(&self, library: &str) -> Option<&Path> {
        self.paths.get(library).map(PathBuf::as_path)
    }

    /// Configured library identifiers, sorted
    pub fn libraries(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<K: Into<String>, V: Into<PathBuf>> FromIterator<(K, V)> for LibraryPaths {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut paths = LibraryPaths::new();
        for (k, v) in iter {
            paths.insert(k, v);
        }
        paths
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfigFile {
    #[serde(default)]
    paths: BTreeMap<String, String>,
    #[serde(default)]
    library: Vec<RawLibrary>,
    #[serde(default)]
    output: OutputSettings,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLibrary {
    name: String,
    pattern: String,
    path: Option<String>,
}

/// `[output]` table of the library file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    pub location: Option<OutputLocation>,
    pub per_library: Option<bool>,
    pub write_empty_report: Option<bool>,
}

/// Parsed library file
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    pub registry: LibraryRegistry,
    pub paths: LibraryPaths,
    pub output: OutputSettings,
    pub source: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            registry: LibraryRegistry::with_defaults(),
            paths: LibraryPaths::new(),
            output: OutputSettings::default(),
            source: None,
        }
    }
}

impl LibraryConfig {
    /// Parses a library file's contents; `origin` is only used in errors
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfigFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut registry = LibraryRegistry::with_defaults();
        let mut paths: LibraryPaths = raw.paths.into_iter().collect();

        for lib in raw.library {
            registry.register(LibraryDefinition::new(lib.name.clone(), &lib.pattern)?)?;
            if let Some(path) = lib.path {
                paths.insert(lib.name, path);
            }
        }

        let config = Self {
            registry,
            paths,
            output: raw.output,
            source: Some(origin.to_path_buf()),
        };
        for library in config.unknown_libraries() {
            warn!(
                library,
                file = %origin.display(),
                "Path configured for an unknown library, it will never be used"
            );
        }
        Ok(config)
    }

    /// Path table entries whose identifier no registered library has
    pub fn unknown_libraries(&self) -> Vec<&str> {
        self.paths
            .libraries()
            .filter(|name| self.registry.get(name).is_none())
            .collect()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        debug!("Loaded library config from {}", path.display());
        Self::from_toml_str(&content, path)
    }

    /// Loads the library file from an explicit path, `LIBDETECT_CONFIG`,
    /// `./libdetect.toml`, or the per-user config directory, in that order.
    ///
    /// Only an explicitly named file is required to exist. With no file the
    /// built-in libraries are used and every path is unconfigured.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(path) = env::var("LIBDETECT_CONFIG") {
            return Self::load(Path::new(&path));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::load(&local);
        }
        if let Some(user) = user_config_path().filter(|p| p.is_file()) {
            return Self::load(&user);
        }

        debug!("No library config found, all library paths are unconfigured");
        Ok(Self::default())
    }
}

/// `<config dir>/libdetect/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("libdetect").join("config.toml"))
}

/// Runtime settings for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectConfig {
    pub output_location: OutputLocation,

    /// Overrides `output_location` when set
    pub output_dir: Option<PathBuf>,

    /// Also write per-library TCL/csh scripts and the csh aggregate
    pub per_library: bool,

    /// Write the report even when nothing was detected
    pub write_empty_report: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for DetectConfig {
    fn default() -> Self {
        let output_location = env::var("LIBDETECT_OUTPUT_LOCATION")
            .ok()
            .and_then(|v| v.parse::<OutputLocation>().ok())
            .unwrap_or(OutputLocation::Netlist);

        let per_library = env::var("LIBDETECT_PER_LIBRARY")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_PER_LIBRARY);

        let log_level = env::var("LIBDETECT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            output_location,
            output_dir: None,
            per_library,
            write_empty_report: false,
            log_level,
        }
    }
}

impl DetectConfig {
    /// Fills in settings the environment left at their defaults from the
    /// library file's `[output]` table
    pub fn apply_file_settings(&mut self, output: &OutputSettings) {
        if env::var("LIBDETECT_OUTPUT_LOCATION").is_err() {
            if let Some(location) = output.location {
                self.output_location = location;
            }
        }
        if env::var("LIBDETECT_PER_LIBRARY").is_err() {
            if let Some(per_library) = output.per_library {
                self.per_library = per_library;
            }
        }
        if let Some(write_empty_report) = output.write_empty_report {
            self.write_empty_report = write_empty_report;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if let Some(dir) = &self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(ConfigError::ValidationFailed(format!(
                    "Output path is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Directory artifacts are written to for `netlist`
    pub fn resolve_output_dir(&self, netlist: &Path) -> io::Result<PathBuf> {
        if let Some(dir) = &self.output_dir {
            if dir.is_absolute() {
                return Ok(dir.clone());
            }
            return Ok(env::current_dir()?.join(dir));
        }
        match self.output_location {
            OutputLocation::Cwd => env::current_dir(),
            OutputLocation::Netlist => {
                let absolute = if netlist.is_absolute() {
                    netlist.to_path_buf()
                } else {
                    env::current_dir()?.join(netlist)
                };
                Ok(absolute
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or(absolute))
            }
        }
    }
}

impl fmt::Display for DetectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Libdetect Configuration:")?;
        writeln!(f, "  Output Location: {:?}", self.output_location)?;
        if let Some(ref dir) = self.output_dir {
            writeln!(f, "  Output Dir: {}", dir.display())?;
        }
        writeln!(f, "  Per-Library Scripts: {}", self.per_library)?;
        writeln!(f, "  Write Empty Report: {}", self.write_empty_report)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
