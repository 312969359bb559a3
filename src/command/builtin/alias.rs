use crate::command::{Command, CommandInfo, Pending};
use crate::context::Context;
use crate::error::ApiError;
use crate::output::Verbosity;
use async_trait::async_trait;
use std::sync::Arc;

/// A named command that forwards to `target` with fixed leading arguments.
pub struct AliasCommand {
    info: CommandInfo,
    target: Arc<dyn Command>,
    bound_args: Vec<String>,
}

impl AliasCommand {
    pub fn new(info: CommandInfo, target: Arc<dyn Command>, bound_args: Vec<String>) -> Self {
        Self {
            info,
            target,
            bound_args,
        }
    }

    pub fn target(&self) -> &str {
        self.target.name()
    }
}

#[async_trait]
impl Command for AliasCommand {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn description(&self) -> &str {
        &self.info.description
    }

    fn default_verbosity(&self) -> Option<Verbosity> {
        self.info.verbosity.or_else(|| self.target.default_verbosity())
    }

    async fn execute(
        &self,
        context: &dyn Context,
        args: &[String],
    ) -> Result<Vec<Pending>, ApiError> {
        let mut all_args = self.bound_args.clone();
        all_args.extend_from_slice(args);
        self.target.execute(context, &all_args).await
    }
}
