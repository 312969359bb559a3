//! External agent adapter
//!
//! Assembles a prompt from stored values, pipes it to a configured executable and
//! returns the executable's stdout as a single pending value. The subprocess is killed
//! when the configured timeout elapses.

use crate::command::builtin::expand_template;
use crate::command::{resolve_or_literal, Command, CommandInfo, Pending};
use crate::context::Context;
use crate::error::ApiError;
use crate::output::Verbosity;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// How to launch one external agent executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Executable name or path
    pub program: String,

    /// Arguments passed before the prompt is written to stdin
    #[serde(default)]
    pub args: Vec<String>,

    /// Seconds before the subprocess is killed
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra environment variables
    #[serde(default)]
    pub env: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    300
}

impl AgentConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout_secs: default_timeout_secs(),
            env: HashMap::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.program.trim().is_empty() {
            return Err("program cannot be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

pub struct ProcessCommand {
    info: CommandInfo,
    agent_name: String,
    agent: AgentConfig,
    prompt: Option<String>,
    token: Option<String>,
}

impl ProcessCommand {
    pub fn new(info: CommandInfo, agent_name: impl Into<String>, agent: AgentConfig) -> Self {
        Self {
            info,
            agent_name: agent_name.into(),
            agent,
            prompt: None,
            token: None,
        }
    }

    /// Prompt template expanded before the invocation arguments.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Token given to the agent's answer.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    async fn assemble_prompt(
        &self,
        context: &dyn Context,
        args: &[String],
    ) -> Result<String, ApiError> {
        let mut parts = Vec::new();
        if let Some(prompt) = &self.prompt {
            parts.push(expand_template(context, prompt).await?);
        }
        for arg in args {
            parts.push(resolve_or_literal(context, arg).await);
        }
        if parts.iter().all(|p| p.trim().is_empty()) {
            return Err(ApiError::Validation(format!(
                "Command '{}' produced an empty prompt",
                self.info.name
            )));
        }
        Ok(parts.join("\n\n"))
    }

    async fn invoke(&self, context: &dyn Context, prompt: String) -> Result<String, ApiError> {
        let mut command = tokio::process::Command::new(&self.agent.program);
        command
            .args(&self.agent.args)
            .envs(&self.agent.env)
            .current_dir(context.working_dir())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| {
            ApiError::Execution(format!(
                "Failed to start agent '{}' ({}): {}",
                self.agent_name, self.agent.program, e
            ))
        })?;
        debug!(agent = %self.agent_name, pid = ?child.id(), "Spawned agent process");

        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(prompt.as_bytes()).await {
                    Ok(()) => stdin.shutdown().await?,
                    // The agent may exit without reading its input.
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                    Err(e) => return Err(e),
                }
            }
            Ok::<(), std::io::Error>(())
        };
        let session = async move {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            fed?;
            output
        };

        let seconds = self.agent.timeout_secs;
        let output = match tokio::time::timeout(Duration::from_secs(seconds), session).await {
            Ok(result) => result.map_err(|e| {
                ApiError::Execution(format!("Agent '{}' I/O failed: {}", self.agent_name, e))
            })?,
            Err(_) => {
                warn!(agent = %self.agent_name, seconds, "Agent process timed out; killed");
                return Err(ApiError::Timeout {
                    command: self.info.name.clone(),
                    seconds,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ApiError::Execution(format!(
                "Agent '{}' exited with {}: {}",
                self.agent_name,
                output.status,
                stderr.trim()
            )));
        }
        String::from_utf8(output.stdout).map_err(|_| {
            ApiError::Execution(format!("Agent '{}' wrote non-UTF-8 output", self.agent_name))
        })
    }
}

#[async_trait]
impl Command for ProcessCommand {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn description(&self) -> &str {
        &self.info.description
    }

    fn default_verbosity(&self) -> Option<Verbosity> {
        self.info.verbosity
    }

    async fn execute(
        &self,
        context: &dyn Context,
        args: &[String],
    ) -> Result<Vec<Pending>, ApiError> {
        let prompt = self.assemble_prompt(context, args).await?;
        let answer = self.invoke(context, prompt).await?;
        Ok(vec![
            Pending::new(answer.trim_end()).with_token(self.token.as_deref())
        ])
    }
}
