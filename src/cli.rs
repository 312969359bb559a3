//! CLI domain: parse, route, help, output, and presentation only.
//! Engine behavior lives in `command`, `context` and `output`; the route table wires them.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_command_list, format_load_failures};
pub use route::{RouteOutput, RunContext, RunOptions};
