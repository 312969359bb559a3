//! Execution context
//!
//! The Context is what Commands run against. It owns the References produced during
//! one task invocation and exposes `store`, `get` and `run`. Two variants share the
//! contract: [`EphemeralContext`] keeps everything in memory, [`PersistedContext`]
//! additionally writes one file per Reference into a per-invocation run directory.
//!
//! Both variants answer `get` from their in-process index. Persisted files are output
//! artifacts; they are never read back.

pub mod ephemeral;
pub mod index;
pub mod persisted;

pub use ephemeral::EphemeralContext;
pub use index::ReferenceIndex;
pub use persisted::{PersistedContext, MANIFEST_FILE};

use crate::command::Command;
use crate::error::{ApiError, StorageError};
use crate::reference::{Decorator, Reference};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contract every Command sees.
#[async_trait]
pub trait Context: Send + Sync {
    /// Directory relative paths given to commands are resolved against.
    fn working_dir(&self) -> &Path;

    /// Where this context writes its files, if anywhere.
    fn output_location(&self) -> Option<PathBuf> {
        None
    }

    /// Finalize `value` through `decorators` and register the result.
    ///
    /// Only decorator and I/O failures are errors; an existing token is replaced with
    /// a warning.
    async fn store(
        &self,
        value: String,
        decorators: Vec<Decorator>,
    ) -> Result<Reference, StorageError>;

    /// Content for `key`, resolved by id first and token second. `None` is a valid answer.
    async fn get(&self, key: &str) -> Option<String>;

    /// Full Reference for `key`, same resolution order as `get`.
    fn reference(&self, key: &str) -> Option<Reference>;

    /// Execute `command` and store every pending value it returns, in order.
    async fn run(&self, command: &dyn Command, args: &[String])
        -> Result<Vec<Reference>, ApiError>;

    /// Token collisions recorded so far, oldest first.
    fn warnings(&self) -> Vec<String>;
}

/// Shared body of `Context::run` for every variant.
///
/// Command errors propagate untouched; stores happen strictly in the order the command
/// returned its pairs, each one awaited before the next starts.
pub async fn run_command(
    context: &dyn Context,
    command: &dyn Command,
    args: &[String],
) -> Result<Vec<Reference>, ApiError> {
    let pending = command.execute(context, args).await?;
    debug!(
        command = command.name(),
        pending = pending.len(),
        "Command produced pending values"
    );
    let mut references = Vec::with_capacity(pending.len());
    for item in pending {
        let reference = context.store(item.value, item.decorators).await?;
        references.push(reference);
    }
    Ok(references)
}
