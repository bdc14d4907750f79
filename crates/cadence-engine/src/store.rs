//! Storage seam: where event definitions come from.
//!
//! Persistence is outside the engine. Anything that can answer "which definitions
//! involve these users" implements [`EventStore`]; [`InMemoryStore`] is the
//! reference implementation used by tests and the CLI.

use std::collections::BTreeSet;
use std::path::Path;

use crate::definition::{EventDefinition, UserId};
use crate::error::{CadenceError, Result};

/// Read-only access to stored event definitions.
pub trait EventStore {
    /// Every definition whose participants include at least one of `users`.
    ///
    /// No ordering is guaranteed.
    fn definitions_for(&self, users: &BTreeSet<UserId>) -> Result<Vec<EventDefinition>>;
}

impl<S: EventStore + ?Sized> EventStore for &S {
    fn definitions_for(&self, users: &BTreeSet<UserId>) -> Result<Vec<EventDefinition>> {
        (**self).definitions_for(users)
    }
}

/// Definitions held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    definitions: Vec<EventDefinition>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of definitions.
    ///
    /// Definitions are not validated here; malformed entries surface when a query
    /// reaches them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let definitions: Vec<EventDefinition> =
            serde_json::from_str(json).map_err(|e| CadenceError::Store(e.to_string()))?;
        Ok(Self { definitions })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CadenceError::Store(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Add a definition. Returns an error if the id is already taken.
    pub fn insert(&mut self, definition: EventDefinition) -> Result<()> {
        if self.definitions.iter().any(|d| d.id == definition.id) {
            return Err(CadenceError::Store(format!(
                "duplicate event id {}",
                definition.id
            )));
        }
        self.definitions.push(definition);
        Ok(())
    }

    pub fn definitions(&self) -> &[EventDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl FromIterator<EventDefinition> for InMemoryStore {
    fn from_iter<T: IntoIterator<Item = EventDefinition>>(iter: T) -> Self {
        Self {
            definitions: iter.into_iter().collect(),
        }
    }
}

impl EventStore for InMemoryStore {
    fn definitions_for(&self, users: &BTreeSet<UserId>) -> Result<Vec<EventDefinition>> {
        Ok(self
            .definitions
            .iter()
            .filter(|d| d.involves_any(users))
            .cloned()
            .collect())
    }
}
