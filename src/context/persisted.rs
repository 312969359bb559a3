//! Directory-backed Context
//!
//! Writes one file per stored Reference under
//! `{output_root}/{YYYYMMDDTHHMMSS}-{task}/{file_name}`. The run directory is created
//! lazily on the first successful store and is never shared with another invocation:
//! if the name is already taken a numeric suffix is appended.

use crate::command::Command;
use crate::context::{run_command, Context, ReferenceIndex};
use crate::error::{ApiError, StorageError};
use crate::reference::{
    apply_decorators, validate_relative_path, Decorator, Reference, TEMP_FILE_PREFIX,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// File written by [`PersistedContext::write_manifest`]. No Reference may take this name.
pub const MANIFEST_FILE: &str = "references.json";

pub struct PersistedContext {
    working_dir: PathBuf,
    output_root: PathBuf,
    task_name: String,
    started_at: DateTime<Utc>,
    run_dir: OnceCell<PathBuf>,
    index: RwLock<ReferenceIndex>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    task: &'a str,
    started_at: DateTime<Utc>,
    references: Vec<&'a Reference>,
}

impl PersistedContext {
    /// Create a context for one invocation of `task_name`. No directory is created yet.
    pub fn new(
        working_dir: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        task_name: &str,
    ) -> Result<Self, ApiError> {
        Self::started_at(working_dir, output_root, task_name, Utc::now())
    }

    /// Same as [`PersistedContext::new`] with an explicit invocation time.
    pub fn started_at(
        working_dir: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        task_name: &str,
        started_at: DateTime<Utc>,
    ) -> Result<Self, ApiError> {
        let task_name = sanitize_task_name(task_name)?;
        let working_dir = working_dir.into();
        let output_root = output_root.into();
        let output_root = if output_root.is_absolute() {
            output_root
        } else {
            working_dir.join(output_root)
        };
        Ok(Self {
            working_dir,
            output_root,
            task_name,
            started_at,
            run_dir: OnceCell::new(),
            index: RwLock::new(ReferenceIndex::new()),
        })
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// Run directory name before any collision suffix is applied.
    pub fn run_dir_name(&self) -> String {
        format!(
            "{}-{}",
            self.started_at.format("%Y%m%dT%H%M%S"),
            self.task_name
        )
    }

    /// Run directory, once the first Reference has been written.
    pub fn run_directory(&self) -> Option<&Path> {
        self.run_dir.get().map(PathBuf::as_path)
    }

    /// Every stored Reference in store order.
    pub fn references(&self) -> Vec<Reference> {
        self.index.read().ordered().into_iter().cloned().collect()
    }

    /// Write `references.json` describing every stored Reference.
    ///
    /// Returns `None` when nothing was stored and no run directory exists.
    pub async fn write_manifest(&self) -> Result<Option<PathBuf>, StorageError> {
        let Some(dir) = self.run_dir.get() else {
            return Ok(None);
        };
        let json = {
            let index = self.index.read();
            let manifest = Manifest {
                task: &self.task_name,
                started_at: self.started_at,
                references: index.ordered(),
            };
            serde_json::to_string_pretty(&manifest)
                .map_err(|e| StorageError::Serialization(e.to_string()))?
        };
        let path = dir.join(MANIFEST_FILE);
        write_atomic(&path, &json).await?;
        Ok(Some(path))
    }

    async fn ensure_run_dir(&self) -> Result<&Path, StorageError> {
        let dir = self
            .run_dir
            .get_or_try_init(|| create_unique_dir(&self.output_root, self.run_dir_name()))
            .await?;
        Ok(dir.as_path())
    }
}

#[async_trait]
impl Context for PersistedContext {
    fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn output_location(&self) -> Option<PathBuf> {
        self.run_dir.get().cloned()
    }

    async fn store(
        &self,
        value: String,
        decorators: Vec<Decorator>,
    ) -> Result<Reference, StorageError> {
        let reference = apply_decorators(Reference::new(value), &decorators)?;
        let file_name = reference
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath("reference has no file name".to_string()))?;
        validate_relative_path(file_name).map_err(StorageError::InvalidPath)?;
        if is_manifest_path(file_name) {
            return Err(StorageError::InvalidPath(format!(
                "file name is reserved for the run manifest: {}",
                file_name
            )));
        }

        let dir = self.ensure_run_dir().await?;
        let path = dir.join(file_name);
        write_atomic(&path, reference.content()).await?;
        debug!(
            id = reference.id(),
            token = ?reference.token(),
            path = %path.display(),
            "Persisted reference"
        );

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

fn is_manifest_path(file_name: &str) -> bool {
    let mut normal = Path::new(file_name)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)));
    matches!(
        (normal.next(), normal.next()),
        (Some(Component::Normal(name)), None) if name == MANIFEST_FILE
    )
}

fn sanitize_task_name(task_name: &str) -> Result<String, ApiError> {
    let cleaned: String = task_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        return Err(ApiError::Validation(format!(
            "Invalid task name: '{}'",
            task_name
        )));
    }
    Ok(cleaned)
}

async fn create_unique_dir(root: &Path, name: String) -> Result<PathBuf, StorageError> {
    tokio::fs::create_dir_all(root).await?;
    let mut attempt = 1u32;
    loop {
        let candidate = if attempt == 1 {
            root.join(&name)
        } else {
            root.join(format!("{}-{}", name, attempt))
        };
        match tokio::fs::create_dir(&candidate).await {
            Ok(()) => {
                info!(run_dir = %candidate.display(), "Created run directory");
                return Ok(candidate);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(StorageError::IoError(e)),
        }
    }
}

/// Write to a hidden `.weave-tmp-{uuid}` sibling then rename over `path`.
async fn write_atomic(path: &Path, content: &str) -> Result<(), StorageError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(parent).await?;
    let temp_path = parent.join(format!(
        "{}{}",
        TEMP_FILE_PREFIX,
        uuid::Uuid::new_v4().simple()
    ));

    tokio::fs::write(&temp_path, content).await.map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to write {}: {}", temp_path.display(), e),
        ))
    })?;
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to rename into {}: {}", path.display(), e),
        )));
    }
    Ok(())
}
