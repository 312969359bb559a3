//! In-memory Context. Nothing touches the filesystem.

use crate::command::Command;
use crate::context::{run_command, Context, ReferenceIndex};
use crate::error::{ApiError, StorageError};
use crate::reference::{apply_decorators, Decorator, Reference};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct EphemeralContext {
    working_dir: PathBuf,
    index: RwLock<ReferenceIndex>,
}

impl EphemeralContext {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            index: RwLock::new(ReferenceIndex::new()),
        }
    }

    /// Every stored Reference in store order.
    pub fn references(&self) -> Vec<Reference> {
        self.index.read().ordered().into_iter().cloned().collect()
    }
}

impl Default for EphemeralContext {
    fn default() -> Self {
        Self::new(".")
    }
}

#[async_trait]
impl Context for EphemeralContext {
    fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    async fn store(
        &self,
        value: String,
        decorators: Vec<Decorator>,
    ) -> Result<Reference, StorageError> {
        let reference = apply_decorators(Reference::new(value), &decorators)?;
        debug!(id = reference.id(), token = ?reference.token(), "Stored reference in memory");
        self.index.write().insert(reference.clone());
        Ok(reference)
    }

    async fn get(&self, key: &str) -> Option<String> {
        self.index
            .read()
            .resolve(key)
            .map(|r| r.content().to_string())
    }

    fn reference(&self, key: &str) -> Option<Reference> {
        self.index.read().resolve(key).cloned()
    }

    async fn run(
        &self,
        command: &dyn Command,
        args: &[String],
    ) -> Result<Vec<Reference>, ApiError> {
        run_command(self, command, args).await
    }

    fn warnings(&self) -> Vec<String> {
        self.index.read().warnings().to_vec()
    }
}
