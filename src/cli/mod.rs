pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, OutputFormatArg, OutputLocationArg};
pub use handlers::handle_detect;
pub use output::{OutputFormat, OutputFormatter, RunSummary};
