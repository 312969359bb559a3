//! Reference data model
//!
//! A Reference is the handle for one stored value: an opaque id assigned at creation,
//! an optional human-chosen token, the content itself, the creation timestamp, the file
//! name it persists under and the ordered history of decorators that shaped it.
//!
//! References are values. Every change goes through one of the `with_*` methods, which
//! return a new Reference and leave the receiver untouched; the id and content set at
//! creation survive every decorator.

pub mod decorator;

pub use decorator::{apply_decorators, default_file_name, Decorator};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extension used by default naming when no decorator picks one.
pub const DEFAULT_EXTENSION: &str = "txt";

/// Prefix of in-flight temp files in a run directory. Reserved.
pub const TEMP_FILE_PREFIX: &str = ".weave-tmp-";

/// One applied decorator, appended to a Reference's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRecord {
    pub decorator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Handle to a value stored in a Context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip)]
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    extension: String,
    metadata: Vec<TransformRecord>,
}

impl Reference {
    /// Create a base Reference with a fresh id and the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_timestamp(content, Utc::now())
    }

    /// Create a base Reference with a fresh id and an explicit creation time.
    pub fn with_timestamp(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            token: None,
            content: content.into(),
            timestamp,
            file_name: None,
            extension: DEFAULT_EXTENSION.to_string(),
            metadata: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Relative path under the run directory, once assigned.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Decorators applied to this Reference, oldest first.
    pub fn metadata(&self) -> &[TransformRecord] {
        &self.metadata
    }

    /// Token when present, otherwise the id. Used for naming and display.
    pub fn label(&self) -> &str {
        self.token.as_deref().unwrap_or(&self.id)
    }

    /// New Reference carrying `token`. A token is set at most once; re-applying the
    /// same token is accepted, a different one is rejected.
    pub fn with_token(&self, token: impl Into<String>) -> Result<Self, String> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err("token must not be empty".to_string());
        }
        match &self.token {
            Some(existing) if existing != &token => Err(format!(
                "token already set to '{}', cannot change it to '{}'",
                existing, token
            )),
            _ => Ok(Self {
                token: Some(token),
                ..self.clone()
            }),
        }
    }

    /// New Reference with `file_name`; later calls win over earlier ones.
    pub fn with_file_name(&self, file_name: impl Into<String>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            ..self.clone()
        }
    }

    pub fn with_extension(&self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            ..self.clone()
        }
    }

    /// New Reference holding derived content. Identity (id, timestamp) is kept.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }

    pub(crate) fn with_record(&self, record: TransformRecord) -> Self {
        let mut metadata = self.metadata.clone();
        metadata.push(record);
        Self {
            metadata,
            ..self.clone()
        }
    }
}

/// Reject file names that would land outside the run directory.
pub fn validate_relative_path(file_name: &str) -> Result<(), String> {
    let path = std::path::Path::new(file_name);
    if file_name.is_empty() {
        return Err("file name is empty".to_string());
    }
    if path.is_absolute() {
        return Err(format!("file name must be relative: {}", file_name));
    }
    let mut has_name = false;
    for component in path.components() {
        match component {
            std::path::Component::Normal(name) => {
                if name.to_string_lossy().starts_with(TEMP_FILE_PREFIX) {
                    return Err(format!("file name uses a reserved prefix: {}", file_name));
                }
                has_name = true;
            }
            std::path::Component::CurDir => {}
            _ => return Err(format!("file name escapes the run directory: {}", file_name)),
        }
    }
    if !has_name {
        return Err(format!("file name names no file: {}", file_name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reference_has_unique_id() {
        let a = Reference::new("x");
        let b = Reference::new("x");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.extension(), DEFAULT_EXTENSION);
        assert!(a.file_name().is_none());
        assert!(a.metadata().is_empty());
    }

    #[test]
    fn test_with_methods_do_not_touch_receiver() {
        let base = Reference::new("hello");
        let tokened = base.with_token("greeting").unwrap();
        let named = tokened.with_file_name("g.md");

        assert!(base.token().is_none());
        assert!(tokened.file_name().is_none());
        assert_eq!(named.token(), Some("greeting"));
        assert_eq!(named.id(), base.id());
        assert_eq!(named.content(), "hello");
    }

    #[test]
    fn test_token_is_set_once() {
        let r = Reference::new("v").with_token("a").unwrap();
        assert!(r.with_token("a").is_ok());
        assert!(r.with_token("b").is_err());
        assert!(Reference::new("v").with_token("  ").is_err());
    }

    #[test]
    fn test_extension_strips_leading_dot() {
        let r = Reference::new("{}").with_extension(".json");
        assert_eq!(r.extension(), "json");
    }

    #[test]
    fn test_validate_relative_path() {
        assert!(validate_relative_path("a.txt").is_ok());
        assert!(validate_relative_path("nested/a.txt").is_ok());
        assert!(validate_relative_path("").is_err());
        assert!(validate_relative_path("/etc/passwd").is_err());
        assert!(validate_relative_path("../outside.txt").is_err());
    }

    #[test]
    fn test_path_without_file_component_is_rejected() {
        assert!(validate_relative_path(".").is_err());
        assert!(validate_relative_path("./").is_err());
        assert!(validate_relative_path("./a.txt").is_ok());
    }

    #[test]
    fn test_temp_prefix_is_reserved() {
        assert!(validate_relative_path(".weave-tmp-1234").is_err());
        assert!(validate_relative_path("sub/.weave-tmp-x").is_err());
        assert!(validate_relative_path("a.txt.tmp").is_ok());
        assert!(validate_relative_path(".hidden").is_ok());
    }
}
