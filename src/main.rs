use libdetect::cli::{handle_detect, CliArgs};
use libdetect::util::logging::{init_logging, parse_level, LoggingConfig};
use libdetect::VERSION;

use clap::Parser;
use std::env;
use std::process;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("libdetect v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    process::exit(handle_detect(&args));
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = if args.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::default()
    };

    // An invalid LIBDETECT_LOG_LEVEL is reported by DetectConfig::validate
    config.level = if let Some(level_str) = &args.log_level {
        parse_level(level_str).unwrap_or(Level::INFO)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        env::var("LIBDETECT_LOG_LEVEL")
            .ok()
            .and_then(|level_str| parse_level(&level_str))
            .unwrap_or(Level::INFO)
    };

    config.use_json = env::var("LIBDETECT_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(config);
}
