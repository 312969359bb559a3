//! CLI help and command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name string for log records (e.g. "run.template", "list").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Run { name, .. } => format!("run.{}", name),
        Commands::List => "list".to_string(),
    }
}
