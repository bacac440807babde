use super::{LibraryDefinition, BUILTIN_LIBRARIES};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid naming pattern for library {name}: {message}")]
    InvalidPattern { name: String, message: String },

    #[error("Invalid library name '{0}': use only letters, digits and '_'")]
    InvalidName(String),

    #[error("Library already registered: {0}")]
    DuplicateLibrary(String),
}

/// Ordered set of known library families.
///
/// Registration order is the canonical order: it drives the order of match
/// counts, the detected list, and every emitted artifact.
#[derive(Debug, Clone, Default)]
pub struct LibraryRegistry {
    libraries: Vec<LibraryDefinition>,
}

impl LibraryRegistry {
    pub fn new() -> Self {
        Self {
            libraries: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, pattern) in BUILTIN_LIBRARIES {
            let library = LibraryDefinition::new(*name, pattern).expect("valid regex");
            registry.libraries.push(library);
        }
        registry
    }

    pub fn register(&mut self, library: LibraryDefinition) -> Result<(), RegistryError> {
        if self.get(library.name()).is_some() {
            return Err(RegistryError::DuplicateLibrary(library.name().to_string()));
        }
        self.libraries.push(library);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LibraryDefinition> {
        self.libraries.iter().find(|l| l.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LibraryDefinition> {
        self.libraries.iter()
    }

    /// Library names in canonical order
    pub fn names(&self) -> Vec<&str> {
        self.libraries.iter().map(|l| l.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}
