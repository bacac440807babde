//! Console summary formatting
//!
//! The summary printed to stdout after a run, as JSON, YAML or human-readable text.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

use crate::detection::DetectionResult;
use crate::emit::EmitOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub netlist: PathBuf,
    pub detection: DetectionResult,
    pub artifacts: EmitOutcome,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(summary)
                .context("Failed to serialize run summary to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(summary).context("Failed to serialize run summary to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(summary)),
        }
    }

    fn format_human(&self, summary: &RunSummary) -> String {
        let mut out = String::new();
        let detection = &summary.detection;

        let _ = writeln!(out, "Netlist: {}", summary.netlist.display());
        let _ = writeln!(
            out,
            "Lines scanned: {} ({} excluded)",
            detection.lines_scanned, detection.lines_excluded
        );
        out.push('\n');

        for (library, count) in detection.counts.iter() {
            let marker = if count > 0 { "*" } else { " " };
            let _ = writeln!(out, "{} {:30} {:>8}", marker, library, count);
        }

        if !summary.artifacts.unconfigured.is_empty() {
            out.push_str("\nNo library path configured for:\n");
            for library in &summary.artifacts.unconfigured {
                let _ = writeln!(out, "  {}", library);
            }
        }

        if !summary.artifacts.written.is_empty() {
            out.push_str("\nGenerated:\n");
            for path in &summary.artifacts.written {
                let _ = writeln!(out, "  {}", path.display());
            }
        }

        out
    }
}
