//! Command router: name → Command table and the output-wrapped executor.

use crate::command::Command;
use crate::context::Context;
use crate::error::ApiError;
use crate::output::{ExecutionSummary, FailureSummary, OutputBuilder, Section};
use crate::reference::Reference;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Registry of every command reachable by name.
#[derive(Default)]
pub struct CommandRouter {
    commands: BTreeMap<String, Arc<dyn Command>>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router pre-populated with the built-in leaf commands.
    pub fn with_builtins() -> Self {
        let mut router = Self::new();
        for command in crate::command::builtin::all() {
            router.register(command);
        }
        router
    }

    /// Register `command` under its own name, returning any command it replaced.
    pub fn register(&mut self, command: Arc<dyn Command>) -> Option<Arc<dyn Command>> {
        let name = command.name().to_string();
        debug!(command = %name, "Registering command");
        self.commands.insert(name, command)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Registered commands, sorted by name.
    pub fn commands(&self) -> Vec<Arc<dyn Command>> {
        self.commands.values().cloned().collect()
    }

    /// Look up `name` and run it against `context`.
    pub async fn execute(
        &self,
        name: &str,
        args: &[String],
        context: &dyn Context,
    ) -> Result<Vec<Reference>, ApiError> {
        let command = self
            .get(name)
            .ok_or_else(|| ApiError::UnknownCommand(name.to_string()))?;
        context.run(command.as_ref(), args).await
    }

    /// Execute `name` with `output` recording progress, one section per Reference and a
    /// single summary. The caller owns `output` and calls `build` afterwards.
    pub async fn dispatch(
        &self,
        name: &str,
        args: &[String],
        context: &dyn Context,
        output: &mut dyn OutputBuilder,
    ) -> Result<Vec<Reference>, ApiError> {
        let started = Instant::now();
        output.add_progress(&format!("Running '{}' with {} argument(s)", name, args.len()));

        let result = self.execute(name, args, context).await;
        let duration_ms = started.elapsed().as_millis();

        let (references, failure) = match &result {
            Ok(references) => {
                info!(
                    command = name,
                    references = references.len(),
                    duration_ms = duration_ms as u64,
                    "Command completed"
                );
                output.add_progress(&format!("Stored {} reference(s)", references.len()));
                (references.clone(), None)
            }
            Err(e) => {
                error!(command = name, category = e.category(), "Command failed: {}", e);
                (Vec::new(), Some(FailureSummary::from_error(e)))
            }
        };

        for reference in &references {
            output.add_section(Section::for_reference(reference));
        }
        output.add_summary(ExecutionSummary {
            command: name.to_string(),
            references,
            output_location: context.output_location(),
            warnings: context.warnings(),
            duration_ms,
            failure,
        });
        result
    }
}
