//! Shared test doubles for integration tests

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use weave::command::{Command, Pending};
use weave::context::Context;
use weave::error::ApiError;
use weave::reference::Decorator;

/// Decorator that always fails.
pub fn failing_decorator() -> Decorator {
    Decorator::new("failing", |_| Err("refused".to_string()))
}

/// Command returning a fixed list of values, each with an optional token.
pub struct FixedCommand {
    pub values: Vec<(String, Option<String>)>,
}

impl FixedCommand {
    pub fn new(values: &[(&str, Option<&str>)]) -> Self {
        Self {
            values: values
                .iter()
                .map(|(v, t)| (v.to_string(), t.map(str::to_string)))
                .collect(),
        }
    }
}

#[async_trait]
impl Command for FixedCommand {
    fn name(&self) -> &str {
        "fixed"
    }

    fn description(&self) -> &str {
        "returns a fixed list of values"
    }

    async fn execute(
        &self,
        _context: &dyn Context,
        _args: &[String],
    ) -> Result<Vec<Pending>, ApiError> {
        Ok(self
            .values
            .iter()
            .map(|(value, token)| Pending::new(value.clone()).with_token(token.as_deref()))
            .collect())
    }
}

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Every file under `root`, sorted.
pub fn files_under(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}
