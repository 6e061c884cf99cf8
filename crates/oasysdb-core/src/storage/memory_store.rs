//! Process-local collection store.

use parking_lot::RwLock;
use std::collections::HashMap;

use super::CollectionStore;
use crate::collection::Collection;
use crate::error::{Error, Result};

/// Keeps persisted collections in memory.
///
/// Nothing survives the process. A store shared between several
/// [`crate::Database`] instances behaves like a directory reopened by each.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<(String, Collection)>> {
        Ok(self
            .collections
            .read()
            .iter()
            .map(|(name, collection)| (name.clone(), collection.clone()))
            .collect())
    }

    fn write(&self, name: &str, collection: &Collection, replace: bool) -> Result<()> {
        let mut collections = self.collections.write();
        if !replace && collections.contains_key(name) {
            return Err(Error::CollectionExists(name.to_string()));
        }
        collections.insert(name.to_string(), collection.clone());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.collections
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::CollectionNotFound(name.to_string()))
    }
}
