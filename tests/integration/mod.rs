//! Integration tests for the Weave command engine

mod cli_run;
mod engine_properties;
mod loader_isolation;
mod scenarios;
mod test_utils;

pub use test_utils::*;
