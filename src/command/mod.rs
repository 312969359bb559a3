//! Command protocol
//!
//! A Command computes values; it never persists them. `execute` returns an ordered list
//! of [`Pending`] pairs and the Context decides how they are stored, which lets the same
//! Command run against an in-memory context in tests and a persisted one in production.

pub mod builtin;
pub mod loader;
pub mod router;

pub use loader::{CommandFactories, CommandLoader, CommandManifest, LoadFailure, LoadReport};
pub use router::CommandRouter;

use crate::context::Context;
use crate::error::ApiError;
use crate::output::Verbosity;
use crate::reference::Decorator;
use async_trait::async_trait;

/// A value a Command wants stored, with the decorators to finalize it.
#[derive(Debug, Clone)]
pub struct Pending {
    pub value: String,
    pub decorators: Vec<Decorator>,
}

impl Pending {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            decorators: Vec::new(),
        }
    }

    pub fn with(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    /// Add a token decorator when `token` is present.
    pub fn with_token(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.with(Decorator::token(token)),
            None => self,
        }
    }
}

#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Verbosity used when the caller passes no explicit level.
    fn default_verbosity(&self) -> Option<Verbosity> {
        None
    }

    async fn execute(
        &self,
        context: &dyn Context,
        args: &[String],
    ) -> Result<Vec<Pending>, ApiError>;
}

/// Name, description and declared verbosity shared by configurable commands.
#[derive(Debug, Clone)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    pub verbosity: Option<Verbosity>,
}

impl CommandInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            verbosity: None,
        }
    }
}

/// Content stored under `arg` if it names a Reference, otherwise `arg` itself.
pub async fn resolve_or_literal(context: &dyn Context, arg: &str) -> String {
    match context.get(arg).await {
        Some(content) => content,
        None => arg.to_string(),
    }
}

/// Positional argument `index`, or a Validation error naming it.
pub fn required_arg<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str, ApiError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| ApiError::Validation(format!("Missing required argument: {}", what)))
}
