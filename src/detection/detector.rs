use super::types::{DetectionResult, MatchCounts};
use crate::library::LibraryRegistry;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Lines containing this marker are skipped for every library
pub const EXCLUSION_MARKER: &str = "__";

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("File '{0}' not found")]
    FileNotFound(PathBuf),

    #[error("Failed to read netlist {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
}

/// Scans netlist text for the naming conventions of every registered library
#[derive(Debug, Clone)]
pub struct Detector {
    registry: LibraryRegistry,
}

impl Detector {
    pub fn new(registry: LibraryRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LibraryRegistry {
        &self.registry
    }

    /// Counts, per library, the lines where its pattern occurs at least once.
    ///
    /// A line containing `__` contributes to no library at all. Libraries are
    /// tested independently, so one line can bump several counters.
    pub fn detect(&self, text: &str) -> DetectionResult {
        let mut counts = MatchCounts::zeroed(self.registry.names());
        let mut lines_scanned = 0;
        let mut lines_excluded = 0;

        for line in netlist_lines(text) {
            lines_scanned += 1;
            if line.contains(EXCLUSION_MARKER) {
                lines_excluded += 1;
                continue;
            }
            for (index, library) in self.registry.iter().enumerate() {
                if library.matches(line) {
                    counts.increment_at(index);
                }
            }
        }

        let detected = counts.detected();
        debug!(
            lines_scanned,
            lines_excluded,
            detected = detected.len(),
            "Netlist scan finished"
        );

        DetectionResult {
            counts,
            detected,
            lines_scanned,
            lines_excluded,
        }
    }

    pub fn detect_file(&self, path: &Path) -> Result<DetectionResult, DetectError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DetectError::FileNotFound(path.to_path_buf()),
            _ => DetectError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        info!("Scanning netlist {}", path.display());

        let text = String::from_utf8_lossy(&bytes);
        Ok(self.detect(&text))
    }
}

/// Splits on `\n`, `\r\n` and a lone `\r`. A final terminator does not
/// produce a trailing empty line.
pub fn netlist_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(LibraryRegistry::with_defaults())
    }
}
