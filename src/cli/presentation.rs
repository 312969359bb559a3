//! Presentation: text formatters for `weave list` and loader diagnostics.

use crate::command::{CommandRouter, LoadFailure};
use comfy_table::Table;

pub fn format_command_list(router: &CommandRouter) -> String {
    let commands = router.commands();
    if commands.is_empty() {
        return "No commands registered.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Command", "Verbosity", "Description"]);
    for command in commands {
        let verbosity = command
            .default_verbosity()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            command.name().to_string(),
            verbosity,
            command.description().to_string(),
        ]);
    }
    table.to_string()
}

/// One line per manifest that failed to load.
pub fn format_load_failures(failures: &[LoadFailure]) -> Vec<String> {
    failures
        .iter()
        .map(|failure| format!("warning: skipped {}: {}", failure.path.display(), failure.error))
        .collect()
}
