//! Text renderers for every generated artifact
//!
//! All functions here are pure so output is byte-identical for identical input.

use crate::detection::DetectionResult;
use std::fmt::Write;
use std::path::Path;

pub const REPORT_FILE: &str = "library_detect.rpt";
pub const TCL_AGGREGATE_FILE: &str = "set_all_libs.tcl";
pub const CSH_AGGREGATE_FILE: &str = "set_all_libs.csh";
pub const TEMPUSRC_FILE: &str = ".tempusrc";

pub const NO_LIBRARIES_LINE: &str = "No known library cell names found.";

pub fn tcl_single_file(library: &str) -> String {
    format!("set_lib_used_{}.tcl", library)
}

pub fn csh_single_file(library: &str) -> String {
    format!("set_lib_used_{}.csh", library)
}

/// Space-joined, the separator TCL list consumers expect
pub fn join_tcl(paths: &[&Path]) -> String {
    join(paths, " ")
}

/// Colon-joined, the separator search-path variables expect
pub fn join_search_path(paths: &[&Path]) -> String {
    join(paths, ":")
}

fn join(paths: &[&Path], sep: &str) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn render_report(netlist: &Path, result: &DetectionResult) -> String {
    let mut out = String::new();
    out.push_str("Library Detection Report\n========================\n");
    let _ = writeln!(out, "Netlist File: {}\n", netlist.display());
    for (library, count) in result.counts.iter() {
        let _ = writeln!(out, "{:30}: {}", library, count);
    }
    out.push_str("\nDetected Libraries:\n-------------------\n");
    if result.detected.is_empty() {
        out.push_str(NO_LIBRARIES_LINE);
        out.push('\n');
    } else {
        for library in &result.detected {
            out.push_str(library);
            out.push('\n');
        }
    }
    out
}

pub fn render_tcl_aggregate(paths: &[&Path]) -> String {
    let mut out = String::new();
    out.push_str("# Auto-generated TCL setup file\n");
    out.push_str("puts \"Loading all detected libraries...\"\n");
    let _ = writeln!(out, "set lib_used \"{}\"", join_tcl(paths));
    out.push_str("read_lib $lib_used\n");
    out.push_str("puts \"All libraries loaded successfully.\"\n");
    out
}

pub fn render_csh_aggregate(paths: &[&Path]) -> String {
    let mut out = String::new();
    out.push_str("# Auto-generated csh setup file\n");
    let _ = writeln!(out, "setenv LIB_USED \"{}\"", join_search_path(paths));
    out.push_str("echo \"LIB_USED set for all detected libraries\"\n");
    out
}

pub fn render_tcl_single(library: &str, path: &Path) -> String {
    format!(
        "# Auto-generated TCL setup file for {}\nset lib_used \"{}\"\n",
        library,
        path.display()
    )
}

pub fn render_csh_single(library: &str, path: &Path) -> String {
    format!(
        "# Auto-generated csh setup file for {}\nsetenv LIB_USED \"{}\"\n",
        library,
        path.display()
    )
}

pub fn render_tempusrc(tcl_script: &Path) -> String {
    format!(
        "source {}\nputs \"Loading default Tempus setup...\"\n",
        tcl_script.display()
    )
}
