//! Library families and the naming conventions used to recognize them

mod registry;

pub use registry::{LibraryRegistry, RegistryError};

use regex::Regex;

/// Built-in library families in canonical order, paired with their naming pattern.
///
/// Memory macros are matched by their literal macro name. Standard-cell
/// families are matched by drive-strength suffix conventions; the trailing
/// number has to end on a word boundary so `X1` never matches inside `X1A`.
pub const BUILTIN_LIBRARIES: &[(&str, &str)] = &[
    ("RAK", r"\b[A-Z0-9]+X\d+\b"),
    ("NANGATE", r"\b[A-Z0-9]+_X\d+\b"),
    ("Skywater", r"\bsky130_fd_sc_\w{2}__\w+_\d+\b"),
    ("rf_2p_136d_74w_1m_4b", "rf_2p_136d_74w_1m_4b"),
    ("rf_2p_256d_76w_1m_4b", "rf_2p_256d_76w_1m_4b"),
    ("rf_2p_512d_76w_2m_4b", "rf_2p_512d_76w_2m_4b"),
    ("sram_sp_512d_32w_4m_2b", "sram_sp_512d_32w_4m_2b"),
    ("sram_sp_16384d_36w_16m_8b", "sram_sp_16384d_36w_16m_8b"),
    ("sram_sp_32768d_33w_16m_8b", "sram_sp_32768d_33w_16m_8b"),
];

/// A library family and the pattern its cell names follow in netlist text
#[derive(Debug, Clone)]
pub struct LibraryDefinition {
    name: String,
    pattern: Regex,
}

impl LibraryDefinition {
    /// Names become part of generated file names, so they are limited to
    /// ASCII letters, digits and `_`.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, RegistryError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(RegistryError::InvalidName(name));
        }
        let pattern = Regex::new(pattern).map_err(|e| RegistryError::InvalidPattern {
            name: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { name, pattern })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// True if the pattern occurs anywhere in `line`
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
