//! Weave: command composition with captured references
//!
//! Commands compute values; a Context finalizes each value through a Decorator pipeline
//! into a [`reference::Reference`] that later commands look up by id or token. An output
//! builder chosen per invocation decides how much of that is shown.

pub mod cli;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;
pub mod reference;
