//! Reference index: id and token lookup owned by a single Context.

use crate::reference::Reference;
use std::collections::HashMap;
use tracing::warn;

/// In-memory table of every Reference stored in one Context.
///
/// Tokens are unique by convention only: inserting a second Reference with a known
/// token repoints the token and records a warning. The superseded Reference stays
/// reachable by its id.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    by_id: HashMap<String, Reference>,
    by_token: HashMap<String, String>,
    order: Vec<String>,
    warnings: Vec<String>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `reference`. Returns the collision warning, if one was raised.
    pub fn insert(&mut self, reference: Reference) -> Option<String> {
        let id = reference.id().to_string();
        let mut warning = None;

        if let Some(token) = reference.token() {
            if let Some(previous) = self.by_token.insert(token.to_string(), id.clone()) {
                if previous != id {
                    let message = format!(
                        "Token '{}' reassigned from reference {} to {}",
                        token, previous, id
                    );
                    warn!(token, previous = %previous, current = %id, "Token collision");
                    self.warnings.push(message.clone());
                    warning = Some(message);
                }
            }
        }

        if self.by_id.insert(id.clone(), reference).is_none() {
            self.order.push(id);
        }
        warning
    }

    /// Resolve by id, then by token.
    pub fn resolve(&self, key: &str) -> Option<&Reference> {
        self.by_id.get(key).or_else(|| {
            self.by_token
                .get(key)
                .and_then(|id| self.by_id.get(id))
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every Reference in store order.
    pub fn ordered(&self) -> Vec<&Reference> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .collect()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
