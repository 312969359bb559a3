//! Decorator pipeline
//!
//! A decorator is a pure function `&Reference -> Reference`. `apply_decorators` folds a
//! list of them left to right, records each step in the Reference's history, and finally
//! assigns a default file name when no decorator chose one.

use crate::error::StorageError;
use crate::reference::{Reference, TransformRecord};
use std::fmt;
use std::sync::Arc;

type DecorateFn = dyn Fn(&Reference) -> Result<Reference, String> + Send + Sync;

/// Named, composable Reference transformation.
#[derive(Clone)]
pub struct Decorator {
    name: String,
    detail: Option<String>,
    apply: Arc<DecorateFn>,
}

impl Decorator {
    /// Build a decorator from any pure function. Returning `Err` aborts the whole store.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Reference) -> Result<Reference, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            detail: None,
            apply: Arc::new(f),
        }
    }

    /// Attach the human-readable detail recorded in the transform history.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn token(token: impl Into<String>) -> Self {
        let token = token.into();
        let detail = token.clone();
        Self::new("token", move |r| r.with_token(token.clone())).with_detail(detail)
    }

    pub fn file_name(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let detail = file_name.clone();
        Self::new("file_name", move |r| Ok(r.with_file_name(file_name.clone())))
            .with_detail(detail)
    }

    pub fn extension(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let detail = extension.clone();
        Self::new("extension", move |r| Ok(r.with_extension(extension.clone())))
            .with_detail(detail)
    }

    /// Content transform, e.g. trimming or upper-casing a captured value.
    pub fn transform<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::new(name, move |r| Ok(r.with_content(f(r.content()))))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run this decorator alone. The input Reference is never modified.
    pub fn decorate(&self, reference: &Reference) -> Result<Reference, StorageError> {
        let next = (self.apply)(reference).map_err(|message| StorageError::Decorator {
            decorator: self.name.clone(),
            message,
        })?;
        if next.id() != reference.id() {
            return Err(StorageError::Decorator {
                decorator: self.name.clone(),
                message: "decorators must not reassign the reference id".to_string(),
            });
        }
        Ok(next.with_record(TransformRecord {
            decorator: self.name.clone(),
            detail: self.detail.clone(),
        }))
    }
}

impl fmt::Debug for Decorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("name", &self.name)
            .field("detail", &self.detail)
            .finish()
    }
}

/// Fold `decorators` over `reference` in order, then apply default naming if needed.
///
/// The first failing decorator aborts the fold; nothing partial is returned.
pub fn apply_decorators(
    reference: Reference,
    decorators: &[Decorator],
) -> Result<Reference, StorageError> {
    let mut current = reference;
    for decorator in decorators {
        current = decorator.decorate(&current)?;
    }
    if current.file_name().is_none() {
        let name = default_file_name(&current);
        current = current.with_file_name(name);
    }
    Ok(current)
}

/// `{YYYYMMDDTHHMMSS}-{msec}-{token-or-id}.{ext}`, so listings sort by creation time.
pub fn default_file_name(reference: &Reference) -> String {
    let ts = reference.timestamp();
    format!(
        "{}-{}-{}.{}",
        ts.format("%Y%m%dT%H%M%S"),
        ts.format("%3f"),
        sanitize_label(reference.label()),
        reference.extension()
    )
}

/// Map every character outside `[A-Za-z0-9_-]` to `_`.
///
/// Lossy: `a/b`, `a.b` and `a_b` share a label, so two such tokens stored within the same
/// millisecond get the same default file name and the later write replaces the earlier file.
/// Pass an explicit file name when tokens differ only in punctuation.
fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
