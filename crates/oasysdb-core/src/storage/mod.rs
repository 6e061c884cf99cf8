//! Storage backends for persisted collections.
//!
//! # Public Types
//!
//! - [`CollectionStore`]: persistence trait used by [`crate::Database`]
//! - [`FileStore`]: directory layout with checksummed record files
//! - [`MemoryStore`]: process-local store for in-memory databases and tests

mod file_store;
mod frame;
mod memory_store;


pub use file_store::FileStore;
pub use memory_store::MemoryStore;

use crate::collection::Collection;
use crate::error::{Error, Result};
use std::path::Path;

/// Longest accepted collection name.
pub const MAX_NAME_LEN: usize = 64;

/// Persistence backend for named collections.
///
/// Every method completes its effect before returning. On error the
/// persisted state is the same as before the call.
pub trait CollectionStore: Send + Sync {
    /// Loads every persisted collection.
    ///
    /// # Errors
    ///
    /// Returns a storage-kind error if the persisted state cannot be read or
    /// fails validation.
    fn load_all(&self) -> Result<Vec<(String, Collection)>>;

    /// Persists `collection` under `name`.
    ///
    /// With `replace` set, existing state under `name` is swapped out;
    /// otherwise an existing name fails with [`Error::CollectionExists`].
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    fn write(&self, name: &str, collection: &Collection, replace: bool) -> Result<()>;

    /// Removes the persisted state of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionNotFound`] if nothing is stored under
    /// `name`, or a storage error if removal fails.
    fn remove(&self, name: &str) -> Result<()>;

    /// Directory backing this store, if any.
    fn root(&self) -> Option<&Path> {
        None
    }
}

/// Checks that `name` is 1 to 64 characters of `[A-Za-z0-9_-]`.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] otherwise.
pub fn validate_collection_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}
