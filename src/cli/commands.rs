use crate::util::logging::VALID_LEVELS;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Detect the cell and memory libraries a gate-level netlist uses
#[derive(Parser, Debug)]
#[command(
    name = "libdetect",
    about = "Detect the cell and memory libraries a gate-level netlist uses",
    version,
    long_about = "libdetect scans a gate-level netlist for the cell naming conventions of \
                  known standard-cell and memory libraries, writes a detection report, and \
                  generates TCL/csh setup scripts pointing at the matching liberty files.\n\n\
                  Examples:\n  \
                  libdetect top.v\n  \
                  libdetect --config libs.toml --per-library top.v\n  \
                  libdetect --output-location cwd --format json top.v"
)]
pub struct CliArgs {
    #[arg(value_name = "NETLIST", help = "Gate-level netlist to scan")]
    pub netlist: PathBuf,

    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help = "Library config file (TOML) with liberty paths"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Write artifacts to this directory"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        conflicts_with = "output_dir",
        help = "Write artifacts next to the netlist or into the current directory"
    )]
    pub output_location: Option<OutputLocationArg>,

    #[arg(long, help = "Also write per-library TCL/csh scripts and set_all_libs.csh")]
    pub per_library: bool,

    #[arg(long, help = "Write the report even when no library is detected")]
    pub write_empty_report: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Summary format on stdout"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Print a setenv line for LIB_USED, suitable for eval")]
    pub print_env: bool,

    #[arg(long, help = "Do not set LIB_USED in this process's environment")]
    pub no_export_env: bool,

    #[arg(
        long,
        value_name = "LEVEL",
        value_parser = VALID_LEVELS,
        ignore_case = true,
        help = "Set logging level"
    )]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Verbose logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLocationArg {
    Netlist,
    Cwd,
}

impl From<OutputLocationArg> for crate::config::OutputLocation {
    fn from(arg: OutputLocationArg) -> Self {
        match arg {
            OutputLocationArg::Netlist => crate::config::OutputLocation::Netlist,
            OutputLocationArg::Cwd => crate::config::OutputLocation::Cwd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["libdetect", "top.v"]);
        assert_eq!(args.netlist, PathBuf::from("top.v"));
        assert_eq!(args.format, OutputFormatArg::Human);
        assert!(args.config.is_none());
        assert!(args.output_dir.is_none());
        assert!(args.output_location.is_none());
        assert!(!args.per_library);
        assert!(!args.write_empty_report);
        assert!(!args.print_env);
        assert!(!args.no_export_env);
    }

    #[test]
    fn test_missing_netlist_is_usage_error() {
        let err = CliArgs::try_parse_from(["libdetect"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_all_options() {
        let args = CliArgs::parse_from([
            "libdetect",
            "--config",
            "libs.toml",
            "--output-location",
            "cwd",
            "--per-library",
            "--write-empty-report",
            "--format",
            "yaml",
            "--print-env",
            "--no-export-env",
            "--log-level",
            "debug",
            "netlist/top.v",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("libs.toml")));
        assert_eq!(args.output_location, Some(OutputLocationArg::Cwd));
        assert!(args.per_library);
        assert!(args.write_empty_report);
        assert_eq!(args.format, OutputFormatArg::Yaml);
        assert!(args.print_env);
        assert!(args.no_export_env);
        assert_eq!(args.log_level, Some("debug".to_string()));
        assert_eq!(args.netlist, PathBuf::from("netlist/top.v"));
    }

    #[test]
    fn test_output_dir_conflicts_with_location() {
        let result = CliArgs::try_parse_from([
            "libdetect",
            "-o",
            "out",
            "--output-location",
            "cwd",
            "top.v",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["libdetect", "-v", "-q", "top.v"]).is_err());
    }

    #[test]
    fn test_log_level_rejects_unknown_value() {
        let err = CliArgs::try_parse_from(["libdetect", "--log-level", "loud", "top.v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_log_level_ignores_case() {
        let args = CliArgs::try_parse_from(["libdetect", "--log-level", "DEBUG", "top.v"]).unwrap();
        assert_eq!(args.log_level.map(|l| l.to_lowercase()), Some("debug".to_string()));
    }
}
