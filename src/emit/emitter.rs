use super::templates::{
    self, CSH_AGGREGATE_FILE, REPORT_FILE, TCL_AGGREGATE_FILE, TEMPUSRC_FILE,
};
use crate::config::LibraryPaths;
use crate::detection::DetectionResult;
use serde::Serialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable carrying the resolved library paths
pub const LIB_USED_VAR: &str = "LIB_USED";

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to resolve output directory {path}: {source}")]
    ResolveDir { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    pub output_dir: PathBuf,
    pub per_library: bool,
    pub write_empty_report: bool,
}

impl EmitOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            per_library: false,
            write_empty_report: false,
        }
    }
}

/// Environment change requested by an emission, applied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvUpdate {
    pub key: String,
    pub value: String,
}

impl EnvUpdate {
    /// `setenv` line for csh-family shells to `eval`
    pub fn to_csh(&self) -> String {
        format!("setenv {} \"{}\"", self.key, self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmitOutcome {
    /// Files written, in write order
    pub written: Vec<PathBuf>,

    /// Detected libraries with no configured path
    pub unconfigured: Vec<String>,

    pub env: Option<EnvUpdate>,
}

/// Writes the report and tool setup scripts for a detection result
#[derive(Debug, Clone)]
pub struct ArtifactEmitter {
    paths: LibraryPaths,
    options: EmitOptions,
}

impl ArtifactEmitter {
    pub fn new(paths: LibraryPaths, options: EmitOptions) -> Self {
        Self { paths, options }
    }

    /// Paths of detected libraries in detection order, plus the detected
    /// libraries that have none
    pub fn resolve<'a>(
        &'a self,
        detected: &'a [String],
    ) -> (Vec<(&'a str, &'a Path)>, Vec<String>) {
        let mut resolved = Vec::new();
        let mut unconfigured = Vec::new();
        for library in detected {
            match self.paths.get(library) {
                Some(path) => resolved.push((library.as_str(), path)),
                None => unconfigured.push(library.clone()),
            }
        }
        (resolved, unconfigured)
    }

    pub fn emit(&self, netlist: &Path, result: &DetectionResult) -> Result<EmitOutcome, EmitError> {
        let mut outcome = EmitOutcome::default();

        if !result.has_detections() {
            if self.options.write_empty_report {
                let dir = self.output_dir()?;
                ensure_dir(&dir)?;
                let report = templates::render_report(netlist, result);
                outcome.written.push(write(&dir, REPORT_FILE, &report)?);
            }
            return Ok(outcome);
        }

        let dir = self.output_dir()?;
        ensure_dir(&dir)?;

        let (resolved, unconfigured) = self.resolve(&result.detected);
        for library in &unconfigured {
            warn!(
                library = %library,
                "No library path configured, omitting it from setup scripts"
            );
        }
        outcome.unconfigured = unconfigured;

        let lib_paths: Vec<&Path> = resolved.iter().map(|(_, p)| *p).collect();

        let report = templates::render_report(netlist, result);
        outcome.written.push(write(&dir, REPORT_FILE, &report)?);

        let tcl = templates::render_tcl_aggregate(&lib_paths);
        let tcl_path = write(&dir, TCL_AGGREGATE_FILE, &tcl)?;
        outcome.written.push(tcl_path.clone());

        if self.options.per_library {
            for (library, path) in &resolved {
                let tcl = templates::render_tcl_single(library, path);
                outcome
                    .written
                    .push(write(&dir, &templates::tcl_single_file(library), &tcl)?);

                let csh = templates::render_csh_single(library, path);
                outcome
                    .written
                    .push(write(&dir, &templates::csh_single_file(library), &csh)?);
            }
            let csh = templates::render_csh_aggregate(&lib_paths);
            outcome.written.push(write(&dir, CSH_AGGREGATE_FILE, &csh)?);
        }

        let rc = templates::render_tempusrc(&tcl_path);
        outcome.written.push(write(&dir, TEMPUSRC_FILE, &rc)?);

        outcome.env = Some(EnvUpdate {
            key: LIB_USED_VAR.to_string(),
            value: templates::join_search_path(&lib_paths),
        });

        info!(
            files = outcome.written.len(),
            dir = %dir.display(),
            "Setup files generated"
        );
        Ok(outcome)
    }

    /// The configured output directory, anchored at the current directory
    /// when relative so `.tempusrc` never sources a relative path
    fn output_dir(&self) -> Result<PathBuf, EmitError> {
        let dir = &self.options.output_dir;
        if dir.is_absolute() {
            return Ok(dir.clone());
        }
        env::current_dir()
            .map(|cwd| cwd.join(dir))
            .map_err(|e| EmitError::ResolveDir {
                path: dir.clone(),
                source: e,
            })
    }
}

fn ensure_dir(dir: &Path) -> Result<(), EmitError> {
    if !dir.is_dir() {
        debug!("Creating output directory {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| EmitError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

fn write(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, EmitError> {
    let path = dir.join(file_name);
    fs::write(&path, contents).map_err(|e| EmitError::Write {
        path: path.clone(),
        source: e,
    })?;
    debug!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Detector;
    use serial_test::serial;
    use tempfile::TempDir;

    struct CwdGuard(PathBuf);

    impl CwdGuard {
        fn enter(dir: &Path) -> Self {
            let old = env::current_dir().unwrap();
            env::set_current_dir(dir).unwrap();
            Self(old)
        }
    }

    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = env::set_current_dir(&self.0);
        }
    }

    fn nangate_and_rf() -> DetectionResult {
        Detector::default().detect("INV_X1 u1 ();\nrf_2p_136d_74w_1m_4b mem0 ();\n")
    }

    #[test]
    fn test_unconfigured_library_skipped_with_report_intact() {
        let temp = TempDir::new().unwrap();
        let paths: LibraryPaths = [("NANGATE", "/pdk/nangate.lib")].into_iter().collect();
        let emitter = ArtifactEmitter::new(paths, EmitOptions::new(temp.path()));

        let outcome = emitter.emit(Path::new("top.v"), &nangate_and_rf()).unwrap();

        assert_eq!(outcome.unconfigured, vec!["rf_2p_136d_74w_1m_4b"]);
        let tcl = fs::read_to_string(temp.path().join(TCL_AGGREGATE_FILE)).unwrap();
        assert!(tcl.contains("set lib_used \"/pdk/nangate.lib\"\n"));
        let report = fs::read_to_string(temp.path().join(REPORT_FILE)).unwrap();
        assert!(report.contains("rf_2p_136d_74w_1m_4b\n"));
        assert_eq!(outcome.env.unwrap().value, "/pdk/nangate.lib");
    }

    #[test]
    fn test_nothing_written_without_detections() {
        let temp = TempDir::new().unwrap();
        let emitter = ArtifactEmitter::new(LibraryPaths::new(), EmitOptions::new(temp.path()));
        let result = Detector::default().detect("module top;\nendmodule\n");

        let outcome = emitter.emit(Path::new("top.v"), &result).unwrap();

        assert!(outcome.written.is_empty());
        assert!(outcome.env.is_none());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_empty_report_when_requested() {
        let temp = TempDir::new().unwrap();
        let mut options = EmitOptions::new(temp.path());
        options.write_empty_report = true;
        let emitter = ArtifactEmitter::new(LibraryPaths::new(), options);
        let result = Detector::default().detect("");

        let outcome = emitter.emit(Path::new("top.v"), &result).unwrap();

        assert_eq!(outcome.written, vec![temp.path().join(REPORT_FILE)]);
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("nested").join("setup");
        let paths: LibraryPaths = [("NANGATE", "/pdk/nangate.lib")].into_iter().collect();
        let emitter = ArtifactEmitter::new(paths, EmitOptions::new(&out));

        emitter.emit(Path::new("top.v"), &nangate_and_rf()).unwrap();

        assert!(out.join(REPORT_FILE).is_file());
        assert!(out.join(TEMPUSRC_FILE).is_file());
    }

    #[test]
    #[serial]
    fn test_relative_output_dir_gives_absolute_tempusrc() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let _cwd = CwdGuard::enter(&root);
        let paths: LibraryPaths = [("NANGATE", "/pdk/nangate.lib")].into_iter().collect();
        let emitter = ArtifactEmitter::new(paths, EmitOptions::new("out"));

        let outcome = emitter.emit(Path::new("top.v"), &nangate_and_rf()).unwrap();

        assert!(outcome.written.iter().all(|p| p.starts_with(root.join("out"))));
        let rc = fs::read_to_string(root.join("out").join(TEMPUSRC_FILE)).unwrap();
        assert!(rc.starts_with(&format!(
            "source {}\n",
            root.join("out").join(TCL_AGGREGATE_FILE).display()
        )));
    }

    #[test]
    fn test_per_library_scripts() {
        let temp = TempDir::new().unwrap();
        let paths: LibraryPaths = [
            ("NANGATE", "/pdk/nangate.lib"),
            ("rf_2p_136d_74w_1m_4b", "/pdk/rf136.lib"),
        ]
        .into_iter()
        .collect();
        let mut options = EmitOptions::new(temp.path());
        options.per_library = true;
        let emitter = ArtifactEmitter::new(paths, options);

        let outcome = emitter.emit(Path::new("top.v"), &nangate_and_rf()).unwrap();

        let names: Vec<String> = outcome
            .written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "library_detect.rpt",
                "set_all_libs.tcl",
                "set_lib_used_NANGATE.tcl",
                "set_lib_used_NANGATE.csh",
                "set_lib_used_rf_2p_136d_74w_1m_4b.tcl",
                "set_lib_used_rf_2p_136d_74w_1m_4b.csh",
                "set_all_libs.csh",
                ".tempusrc",
            ]
        );
        let csh = fs::read_to_string(temp.path().join(CSH_AGGREGATE_FILE)).unwrap();
        assert!(csh.contains("setenv LIB_USED \"/pdk/nangate.lib:/pdk/rf136.lib\""));
    }

    #[test]
    fn test_env_update_csh() {
        let update = EnvUpdate {
            key: LIB_USED_VAR.to_string(),
            value: "/a.lib:/b.lib".to_string(),
        };
        assert_eq!(update.to_csh(), "setenv LIB_USED \"/a.lib:/b.lib\"");
    }
}
