//! # `OasysDB` Core
//!
//! Embedded, directory-backed vector database.
//!
//! A [`Database`] is opened at a filesystem path and owns a registry of
//! named [`Collection`]s. Each collection holds records (a vector plus
//! optional [`Metadata`]) of a single dimension under one immutable
//! [`Config`], and answers exact nearest-neighbour queries.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oasysdb::{Collection, Config, Database, Record};
//!
//! // Open or create a database directory
//! let db = Database::open("./data")?;
//!
//! // Create a collection from generated records
//! let records = Record::many_random(128, 100);
//! db.create_collection("vectors", None, Some(records))?;
//!
//! // Collections are returned as owned snapshots
//! let collection = db.get_collection("vectors")?;
//! let results = collection.search(&[0.5; 128], 10)?;
//!
//! // Save a separately built collection under a new name
//! db.save_collection("test", &Collection::new(Config::create_default()))?;
//! db.delete_collection("vectors")?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::significant_drop_tightening)]

pub mod collection;
pub mod config;
pub mod distance;
#[cfg(test)]
mod distance_tests;
pub mod error;
pub mod metadata;
pub mod record;
#[cfg(test)]
mod record_tests;
pub mod storage;

pub use collection::{Collection, Config};
pub use config::{ConfigError, LimitsConfig, OasysConfig, StorageConfig};
pub use distance::DistanceMetric;
pub use error::{Error, ErrorKind, Result};
pub use metadata::Metadata;
pub use record::{Record, RecordId, SearchResult};
pub use storage::{CollectionStore, FileStore, MemoryStore};

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// How [`Database::save_collection_with_mode`] treats an existing name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Fail with [`Error::CollectionExists`] if the name is taken.
    #[default]
    CreateOnly,
    /// Replace the collection stored under the name.
    Overwrite,
}

/// Database instance managing collections and storage.
///
/// Every mutation is persisted before the in-memory registry changes, so a
/// failed call leaves both untouched.
pub struct Database {
    /// Persistence backend
    store: Arc<dyn CollectionStore>,
    /// Database-wide settings
    settings: OasysConfig,
    /// Collections managed by this database
    collections: RwLock<HashMap<String, Collection>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path())
            .field("collections", &self.list_collections())
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Opens or creates a database at the specified path.
    ///
    /// Every persisted collection is loaded eagerly.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the data directory
    ///
    /// # Errors
    ///
    /// Returns a storage-kind error if the path is not a directory, cannot be
    /// read, is not an `OasysDB` layout, or holds corrupted collections.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, OasysConfig::default())
    }

    /// Opens or creates a database with explicit settings.
    ///
    /// # Errors
    ///
    /// Same as [`Database::open`], plus [`Error::Config`] for invalid
    /// settings.
    pub fn open_with_config<P: AsRef<Path>>(path: P, settings: OasysConfig) -> Result<Self> {
        settings.validate()?;
        let store = FileStore::open(path.as_ref(), settings.storage.sync_writes)?;
        let db = Self::with_store(Arc::new(store), settings)?;

        tracing::info!(
            path = %path.as_ref().display(),
            collections = db.len(),
            "Opened database"
        );

        Ok(db)
    }

    /// Creates a new database at the specified path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseNotEmpty`] if the path already holds a
    /// database with at least one collection, or any error of
    /// [`Database::open`].
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::create_with_config(path, OasysConfig::default())
    }

    /// Creates a new database with explicit settings.
    ///
    /// # Errors
    ///
    /// Same as [`Database::create`].
    pub fn create_with_config<P: AsRef<Path>>(path: P, settings: OasysConfig) -> Result<Self> {
        let db = Self::open_with_config(path.as_ref(), settings)?;
        if !db.is_empty() {
            return Err(Error::DatabaseNotEmpty(path.as_ref().to_path_buf()));
        }
        Ok(db)
    }

    /// Creates a database with no backing directory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            settings: OasysConfig::default(),
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Opens a database over a custom persistence backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid settings or any error the
    /// store reports while loading.
    pub fn with_store(store: Arc<dyn CollectionStore>, settings: OasysConfig) -> Result<Self> {
        settings.validate()?;

        let mut collections = HashMap::new();
        for (name, collection) in store.load_all()? {
            if collections.insert(name.clone(), collection).is_some() {
                return Err(Error::Corrupted(format!(
                    "collection '{name}' is stored twice"
                )));
            }
        }

        Ok(Self {
            store,
            settings,
            collections: RwLock::new(collections),
        })
    }

    /// Returns the data directory, or `None` for an in-memory database.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.store.root()
    }

    /// Returns the settings this database was opened with.
    #[must_use]
    pub fn settings(&self) -> &OasysConfig {
        &self.settings
    }

    /// Returns true if no collections are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections.read().is_empty()
    }

    /// Returns the number of registered collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.read().len()
    }

    /// Lists all collection names in the database, sorted.
    #[must_use]
    pub fn list_collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns true if a collection with the given name exists.
    #[must_use]
    pub fn contains_collection(&self, name: &str) -> bool {
        self.collections.read().contains_key(name)
    }

    /// Creates a new collection and persists it.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique name for the collection
    /// * `config` - Collection parameters, [`Config::create_default`] if `None`
    /// * `records` - Records to populate the collection with
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or taken, if the records are
    /// invalid or disagree on dimension, if a configured limit is exceeded,
    /// or if persistence fails.
    pub fn create_collection(
        &self,
        name: &str,
        config: Option<Config>,
        records: Option<Vec<Record>>,
    ) -> Result<()> {
        storage::validate_collection_name(name)?;
        let collection = Collection::build(
            config.unwrap_or_else(Config::create_default),
            records.unwrap_or_default(),
        )?;
        self.check_limits(&collection)?;

        let mut collections = self.collections.write();

        if collections.contains_key(name) {
            return Err(Error::CollectionExists(name.to_string()));
        }
        self.check_capacity(collections.len())?;

        self.store.write(name, &collection, false)?;

        tracing::info!(
            collection = name,
            records = collection.len(),
            dimension = ?collection.dimension(),
            "Created collection"
        );
        collections.insert(name.to_string(), collection);

        Ok(())
    }

    /// Returns a snapshot of a collection by name.
    ///
    /// Changes to the returned value do not affect the database until it is
    /// saved back with [`SaveMode::Overwrite`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionNotFound`] if the collection does not exist.
    pub fn get_collection(&self, name: &str) -> Result<Collection> {
        let collection = self
            .collections
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::CollectionNotFound(name.to_string()))?;

        tracing::debug!(collection = name, records = collection.len(), "Read collection");
        Ok(collection)
    }

    /// Saves a collection under a new name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionExists`] if the name is taken, or any error
    /// of [`Database::save_collection_with_mode`].
    pub fn save_collection(&self, name: &str, collection: &Collection) -> Result<()> {
        self.save_collection_with_mode(name, collection, SaveMode::CreateOnly)
    }

    /// Saves a collection under `name`, optionally replacing an existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, taken under
    /// [`SaveMode::CreateOnly`], a configured limit is exceeded, or
    /// persistence fails.
    pub fn save_collection_with_mode(
        &self,
        name: &str,
        collection: &Collection,
        mode: SaveMode,
    ) -> Result<()> {
        storage::validate_collection_name(name)?;
        collection.config().validate()?;
        self.check_limits(collection)?;

        let mut collections = self.collections.write();

        let exists = collections.contains_key(name);
        if exists && mode == SaveMode::CreateOnly {
            return Err(Error::CollectionExists(name.to_string()));
        }
        if !exists {
            self.check_capacity(collections.len())?;
        }

        self.store.write(name, collection, exists)?;

        tracing::info!(
            collection = name,
            records = collection.len(),
            replaced = exists,
            "Saved collection"
        );
        collections.insert(name.to_string(), collection.clone());

        Ok(())
    }

    /// Deletes a collection and its persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollectionNotFound`] if the collection does not
    /// exist, or a storage error if removal fails.
    pub fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write();

        if !collections.contains_key(name) {
            return Err(Error::CollectionNotFound(name.to_string()));
        }

        self.store.remove(name)?;
        collections.remove(name);

        tracing::info!(collection = name, "Deleted collection");
        Ok(())
    }

    fn check_limits(&self, collection: &Collection) -> Result<()> {
        let limits = &self.settings.limits;

        if let Some(dimension) = collection.dimension() {
            if dimension > limits.max_dimension {
                return Err(Error::LimitExceeded(format!(
                    "dimension {dimension} exceeds the maximum of {}",
                    limits.max_dimension
                )));
            }
        }

        if collection.len() > limits.max_records_per_collection {
            return Err(Error::LimitExceeded(format!(
                "{} records exceed the maximum of {} per collection",
                collection.len(),
                limits.max_records_per_collection
            )));
        }

        Ok(())
    }

    fn check_capacity(&self, current: usize) -> Result<()> {
        let max = self.settings.limits.max_collections;
        if current >= max {
            return Err(Error::LimitExceeded(format!(
                "database already holds the maximum of {max} collections"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_open() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        assert!(db.is_empty());
        assert_eq!(db.len(), 0);
        assert_eq!(db.path(), Some(dir.path()));
    }

    #[test]
    fn test_create_collection() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        db.create_collection("vectors", None, Some(Record::many_random(128, 100)))
            .unwrap();

        assert!(!db.is_empty());
        assert_eq!(db.len(), 1);
        assert_eq!(db.get_collection("vectors").unwrap().len(), 100);
        assert_eq!(db.list_collections(), vec!["vectors"]);
    }

    #[test]
    fn test_create_collection_with_config() {
        let db = Database::in_memory();
        let config = Config::new(DistanceMetric::Cosine).with_relevancy(0.5);

        db.create_collection("docs", Some(config), None).unwrap();

        let collection = db.get_collection("docs").unwrap();
        assert_eq!(*collection.config(), config);
        assert!(collection.is_empty());
    }

    #[test]
    fn test_duplicate_collection_error() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.create_collection("test", None, Some(Record::many_random(4, 3)))
            .unwrap();

        let result = db.create_collection("test", None, None);

        assert!(matches!(result, Err(Error::CollectionExists(_))));
        assert_eq!(db.get_collection("test").unwrap().len(), 3);
    }

    #[test]
    fn test_delete_consistent_when_dir_sync_fails() {
        let dir = tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path(), true).unwrap());
        let db = Database::with_store(store.clone(), OasysConfig::default()).unwrap();
        db.create_collection("docs", None, Some(Record::many_random(4, 3)))
            .unwrap();

        store.fail_dir_sync(true);
        db.delete_collection("docs").unwrap();

        assert!(!db.contains_collection("docs"));
        assert!(matches!(
            db.get_collection("docs"),
            Err(Error::CollectionNotFound(_))
        ));

        store.fail_dir_sync(false);
        drop(db);
        let reopened = Database::open(dir.path()).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_invalid_name_rejected() {
        let db = Database::in_memory();

        let err = db.create_collection("no spaces", None, None).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(db.is_empty());
    }

    #[test]
    fn test_get_missing_collection() {
        let db = Database::in_memory();

        let err = db.get_collection("nonexistent").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_get_collection_is_snapshot() {
        let db = Database::in_memory();
        db.create_collection("docs", None, Some(Record::many_random(2, 2)))
            .unwrap();

        let mut snapshot = db.get_collection("docs").unwrap();
        snapshot.insert(Record::random(2)).unwrap();

        assert_eq!(db.get_collection("docs").unwrap().len(), 2);
    }

    #[test]
    fn test_save_collection() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.create_collection("vectors", None, Some(Record::many_random(8, 10)))
            .unwrap();

        db.save_collection("test", &Collection::new(Config::create_default()))
            .unwrap();

        assert_eq!(db.len(), 2);
    }

    #[test]
    fn test_save_existing_name_rejected() {
        let db = Database::in_memory();
        db.create_collection("docs", None, Some(Record::many_random(2, 5)))
            .unwrap();

        let err = db
            .save_collection("docs", &Collection::new(Config::create_default()))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateName);
        assert_eq!(db.get_collection("docs").unwrap().len(), 5);
    }

    #[test]
    fn test_save_overwrite() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.create_collection("docs", None, Some(Record::many_random(2, 5)))
            .unwrap();

        let mut updated = db.get_collection("docs").unwrap();
        updated.insert(Record::random(2)).unwrap();
        db.save_collection_with_mode("docs", &updated, SaveMode::Overwrite)
            .unwrap();

        assert_eq!(db.len(), 1);
        assert_eq!(db.get_collection("docs").unwrap().len(), 6);

        let reopened = Database::open(dir.path()).unwrap();
        assert_eq!(reopened.get_collection("docs").unwrap().len(), 6);
    }

    #[test]
    fn test_delete_collection() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        db.create_collection("to_delete", None, None).unwrap();

        db.delete_collection("to_delete").unwrap();

        assert!(db.is_empty());
        assert!(db.get_collection("to_delete").is_err());
    }

    #[test]
    fn test_delete_nonexistent_collection() {
        let db = Database::in_memory();

        let result = db.delete_collection("nonexistent");

        assert!(matches!(result, Err(Error::CollectionNotFound(_))));
    }

    #[test]
    fn test_list_collections_sorted() {
        let db = Database::in_memory();
        for name in ["gamma", "alpha", "beta"] {
            db.create_collection(name, None, None).unwrap();
        }

        assert_eq!(db.list_collections(), vec!["alpha", "beta", "gamma"]);
        assert!(db.contains_collection("beta"));
        assert!(!db.contains_collection("delta"));
    }

    #[test]
    fn test_create_fails_on_non_empty_database() {
        let dir = tempdir().unwrap();
        {
            let db = Database::create(dir.path()).unwrap();
            db.create_collection("vectors", None, None).unwrap();
        }

        let err = Database::create(dir.path()).unwrap_err();

        assert!(matches!(err, Error::DatabaseNotEmpty(_)));
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_create_on_empty_existing_database() {
        let dir = tempdir().unwrap();
        drop(Database::open(dir.path()).unwrap());

        assert!(Database::create(dir.path()).is_ok());
    }

    #[test]
    fn test_limits_enforced() {
        let mut settings = OasysConfig::default();
        settings.limits.max_collections = 1;
        settings.limits.max_dimension = 4;
        settings.limits.max_records_per_collection = 3;

        let dir = tempdir().unwrap();
        let db = Database::open_with_config(dir.path(), settings).unwrap();

        let err = db
            .create_collection("wide", None, Some(Record::many_random(8, 1)))
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));

        let err = db
            .create_collection("many", None, Some(Record::many_random(2, 4)))
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));

        db.create_collection("ok", None, None).unwrap();
        let err = db
            .save_collection("second", &Collection::new(Config::create_default()))
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = OasysConfig::default();
        settings.limits.max_collections = 0;
        let dir = tempdir().unwrap();

        let err = Database::open_with_config(dir.path(), settings).unwrap_err();

        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_shared_memory_store_acts_like_reopen() {
        let store = Arc::new(MemoryStore::new());
        let db = Database::with_store(store.clone(), OasysConfig::default()).unwrap();
        db.create_collection("docs", None, Some(Record::many_random(3, 4)))
            .unwrap();

        let again = Database::with_store(store, OasysConfig::default()).unwrap();

        assert_eq!(again.get_collection("docs").unwrap().len(), 4);
    }

    #[test]
    fn test_database_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Database>();
    }
}
