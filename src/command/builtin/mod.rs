//! Built-in leaf commands.
//!
//! One implementation per behaviour. CLI arguments and programmatic callers both reach
//! these through `Command::execute` with a plain argument list.

mod alias;
mod join;
mod pattern;
mod process;
mod read;
mod set;
mod template;

pub use alias::AliasCommand;
pub use join::JoinCommand;
pub use pattern::MatchCommand;
pub use process::{AgentConfig, ProcessCommand};
pub use read::ReadCommand;
pub use set::SetCommand;
pub use template::{expand_template, TemplateCommand};

use crate::command::Command;
use std::sync::Arc;

/// Every built-in that needs no configuration.
pub fn all() -> Vec<Arc<dyn Command>> {
    vec![
        Arc::new(SetCommand),
        Arc::new(JoinCommand),
        Arc::new(MatchCommand),
        Arc::new(ReadCommand),
        Arc::new(TemplateCommand),
    ]
}
