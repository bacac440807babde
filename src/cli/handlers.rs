use super::commands::CliArgs;
use super::output::{OutputFormatter, RunSummary};
use crate::config::{DetectConfig, LibraryConfig};
use crate::detection::Detector;
use crate::emit::{ArtifactEmitter, EmitOptions};
use std::env;
use tracing::{debug, error, info, warn};

pub const SUCCESS_MESSAGE: &str = "Library detection and setup completed.";
pub const NO_DETECTION_MESSAGE: &str = "No known libraries detected in the given netlist.";

/// Runs one detection and emission pass; returns the process exit code
pub fn handle_detect(args: &CliArgs) -> i32 {
    let library_config = match LibraryConfig::discover(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return 1;
        }
    };
    if let Some(source) = &library_config.source {
        debug!("Library config: {}", source.display());
    }

    let mut config = DetectConfig::default();
    config.apply_file_settings(&library_config.output);
    if let Some(location) = args.output_location {
        config.output_location = location.into();
    }
    config.output_dir = args.output_dir.clone();
    config.per_library |= args.per_library;
    config.write_empty_report |= args.write_empty_report;
    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    }

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return 1;
    }
    debug!("{}", config);

    let detector = Detector::new(library_config.registry);
    for library in detector.registry().iter() {
        debug!(library = library.name(), pattern = library.pattern(), "Naming pattern");
    }
    let result = match detector.detect_file(&args.netlist) {
        Ok(result) => result,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    let output_dir = match config.resolve_output_dir(&args.netlist) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to resolve output directory: {}", e);
            return 1;
        }
    };

    let emitter = ArtifactEmitter::new(
        library_config.paths,
        EmitOptions {
            output_dir,
            per_library: config.per_library,
            write_empty_report: config.write_empty_report,
        },
    );
    let outcome = match emitter.emit(&args.netlist, &result) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    if let Some(update) = &outcome.env {
        if !args.no_export_env {
            env::set_var(&update.key, &update.value);
            debug!("{}={}", update.key, update.value);
        }
        if args.print_env {
            println!("{}", update.to_csh());
        }
    }

    let detected_any = result.has_detections();
    let summary = RunSummary {
        netlist: args.netlist.clone(),
        detection: result,
        artifacts: outcome,
    };

    if !args.quiet && !args.print_env {
        match OutputFormatter::new(args.format.into()).format(&summary) {
            Ok(text) => print!("{}", text),
            Err(e) => {
                error!("{:#}", e);
                return 1;
            }
        }
    }

    if detected_any {
        info!("{}", SUCCESS_MESSAGE);
    } else {
        warn!("{}", NO_DETECTION_MESSAGE);
    }

    0
}
