//! Directory-backed collection store.
//!
//! ```text
//! <root>/manifest.json                      {"format": "oasysdb", "version": 1}
//! <root>/collections/<name>/config.json     name, config, dimension, counts
//! <root>/collections/<name>/records.bin     framed bincode records
//! ```
//!
//! Collections are written into a hidden staging directory and installed
//! with a rename. Deletions rename into a hidden trash directory first, so
//! an interrupted operation never leaves a half-written visible collection.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{frame, validate_collection_name, CollectionStore};
use crate::collection::{Collection, Config};
use crate::error::{Error, Result};
use crate::record::{Record, RecordId};

const MANIFEST_FILE: &str = "manifest.json";
const COLLECTIONS_DIR: &str = "collections";
const CONFIG_FILE: &str = "config.json";
const RECORDS_FILE: &str = "records.bin";

const FORMAT_NAME: &str = "oasysdb";
const FORMAT_VERSION: u32 = 1;

const STAGING_PREFIX: &str = ".staging-";
const TRASH_PREFIX: &str = ".trash-";

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    format: String,
    version: u32,
}

/// Contents of a collection's `config.json`.
#[derive(Debug, Serialize, Deserialize)]
struct CollectionMeta {
    name: String,
    config: Config,
    dimension: Option<usize>,
    next_id: u32,
    records: usize,
}

fn with_path(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |e| Error::Storage(format!("{}: {e}", path.display()))
}

/// Collection store rooted at a database directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    collections_dir: PathBuf,
    sync_writes: bool,
    #[cfg(test)]
    fail_dir_sync: std::sync::atomic::AtomicBool,
}

impl FileStore {
    /// Opens the database directory at `root`, initializing it when it is
    /// missing or empty.
    ///
    /// Hidden leftovers from an interrupted write or delete are removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if `root` is not a directory, cannot be
    /// read, or holds files that are not an `OasysDB` layout.
    pub fn open<P: AsRef<Path>>(root: P, sync_writes: bool) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if root.exists() && !root.is_dir() {
            return Err(Error::Storage(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        fs::create_dir_all(&root).map_err(with_path(&root))?;

        let store = Self {
            collections_dir: root.join(COLLECTIONS_DIR),
            root,
            sync_writes,
            #[cfg(test)]
            fail_dir_sync: std::sync::atomic::AtomicBool::new(false),
        };

        store.check_manifest()?;
        fs::create_dir_all(&store.collections_dir).map_err(with_path(&store.collections_dir))?;
        store.remove_leftovers()?;

        Ok(store)
    }

    fn check_manifest(&self) -> Result<()> {
        let manifest_path = self.root.join(MANIFEST_FILE);

        if manifest_path.is_file() {
            let data = fs::read(&manifest_path).map_err(with_path(&manifest_path))?;
            let manifest: Manifest = serde_json::from_slice(&data).map_err(|e| {
                Error::Storage(format!("{}: invalid manifest: {e}", manifest_path.display()))
            })?;

            if manifest.format != FORMAT_NAME {
                return Err(Error::Storage(format!(
                    "{} is not an OasysDB database (format '{}')",
                    self.root.display(),
                    manifest.format
                )));
            }
            if manifest.version != FORMAT_VERSION {
                return Err(Error::Storage(format!(
                    "unsupported database version {} at {}",
                    manifest.version,
                    self.root.display()
                )));
            }
            return Ok(());
        }

        let mut entries = fs::read_dir(&self.root).map_err(with_path(&self.root))?;
        if entries.next().is_some() {
            return Err(Error::Storage(format!(
                "{} is not empty and holds no OasysDB manifest",
                self.root.display()
            )));
        }

        let manifest = Manifest {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
        };
        self.write_file(&manifest_path, &serde_json::to_vec_pretty(&manifest)?)?;
        tracing::debug!(path = %self.root.display(), "Initialized database directory");

        Ok(())
    }

    fn remove_leftovers(&self) -> Result<()> {
        for entry in fs::read_dir(&self.collections_dir).map_err(with_path(&self.collections_dir))? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };

            if name.starts_with(STAGING_PREFIX) || name.starts_with(TRASH_PREFIX) {
                tracing::warn!(
                    path = %entry.path().display(),
                    "Removing leftover from an interrupted operation"
                );
                if let Err(e) = fs::remove_dir_all(entry.path()) {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Cleanup failed");
                }
            }
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let mut file = File::create(path).map_err(with_path(path))?;
        file.write_all(data).map_err(with_path(path))?;
        if self.sync_writes {
            file.sync_all().map_err(with_path(path))?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn fail_dir_sync(&self, fail: bool) {
        self.fail_dir_sync
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[cfg(unix)]
    fn sync_collections_dir(&self) -> Result<()> {
        #[cfg(test)]
        {
            if self.fail_dir_sync.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(Error::Storage("directory sync failed".to_string()));
            }
        }
        if self.sync_writes {
            File::open(&self.collections_dir)
                .and_then(|dir| dir.sync_all())
                .map_err(with_path(&self.collections_dir))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_collections_dir(&self) -> Result<()> {
        #[cfg(test)]
        {
            if self.fail_dir_sync.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(Error::Storage("directory sync failed".to_string()));
            }
        }
        Ok(())
    }

    /// Syncs the collections directory after a rename. Failures are logged
    /// only: the rename has already taken effect.
    fn sync_after_rename(&self, name: &str) {
        if let Err(e) = self.sync_collections_dir() {
            tracing::warn!(collection = name, error = %e, "Directory sync failed");
        }
    }

    fn stage(&self, staging: &Path, name: &str, collection: &Collection) -> Result<()> {
        fs::create_dir(staging).map_err(with_path(staging))?;

        let records: Vec<(RecordId, &Record)> = collection.list();
        let meta = CollectionMeta {
            name: name.to_string(),
            config: *collection.config(),
            dimension: collection.dimension(),
            next_id: collection.next_id(),
            records: records.len(),
        };

        let body = bincode::serialize(&records)?;
        self.write_file(&staging.join(RECORDS_FILE), &frame::encode(&body))?;
        self.write_file(
            &staging.join(CONFIG_FILE),
            &serde_json::to_vec_pretty(&meta)?,
        )?;

        Ok(())
    }

    fn load_one(&self, name: &str, dir: &Path) -> Result<Collection> {
        let config_path = dir.join(CONFIG_FILE);
        let data = fs::read(&config_path).map_err(with_path(&config_path))?;
        let meta: CollectionMeta = serde_json::from_slice(&data).map_err(|e| {
            Error::Corrupted(format!("{}: {e}", config_path.display()))
        })?;

        if meta.name != name {
            return Err(Error::Corrupted(format!(
                "{} names collection '{}'",
                config_path.display(),
                meta.name
            )));
        }

        let records_path = dir.join(RECORDS_FILE);
        let data = fs::read(&records_path).map_err(with_path(&records_path))?;
        let body = frame::decode(&data)
            .map_err(|e| Error::Corrupted(format!("{}: {e}", records_path.display())))?;
        let records: Vec<(RecordId, Record)> = bincode::deserialize(body)
            .map_err(|e| Error::Corrupted(format!("{}: {e}", records_path.display())))?;

        if records.len() != meta.records {
            return Err(Error::Corrupted(format!(
                "collection '{name}' lists {} records but {} were found",
                meta.records,
                records.len()
            )));
        }

        Collection::from_parts(meta.config, meta.dimension, meta.next_id, records)
    }

    fn discard(path: &Path) {
        if let Err(e) = fs::remove_dir_all(path) {
            tracing::warn!(path = %path.display(), error = %e, "Cleanup failed");
        }
    }
}

impl CollectionStore for FileStore {
    fn load_all(&self) -> Result<Vec<(String, Collection)>> {
        let mut collections = Vec::new();

        for entry in fs::read_dir(&self.collections_dir).map_err(with_path(&self.collections_dir))? {
            let entry = entry?;
            let path = entry.path();
            let file_name = entry.file_name();

            let name = file_name.to_str().ok_or_else(|| {
                Error::Storage(format!("{}: name is not UTF-8", path.display()))
            })?;
            if name.starts_with('.') {
                continue;
            }
            if !path.is_dir() {
                return Err(Error::Storage(format!(
                    "unexpected file {} in collections directory",
                    path.display()
                )));
            }
            validate_collection_name(name)
                .map_err(|e| Error::Corrupted(format!("{}: {e}", path.display())))?;

            let collection = self.load_one(name, &path)?;
            tracing::debug!(collection = name, records = collection.len(), "Loaded collection");
            collections.push((name.to_string(), collection));
        }

        Ok(collections)
    }

    fn write(&self, name: &str, collection: &Collection, replace: bool) -> Result<()> {
        let target = self.collections_dir.join(name);
        if target.exists() && !replace {
            return Err(Error::CollectionExists(name.to_string()));
        }

        let staging = self.collections_dir.join(format!("{STAGING_PREFIX}{name}"));
        if staging.exists() {
            Self::discard(&staging);
        }

        if let Err(e) = self.stage(&staging, name, collection) {
            Self::discard(&staging);
            return Err(e);
        }

        let trash = self.collections_dir.join(format!("{TRASH_PREFIX}{name}"));
        let replaced = target.exists();
        if replaced && trash.exists() {
            Self::discard(&trash);
        }
        if replaced {
            if let Err(e) = fs::rename(&target, &trash) {
                Self::discard(&staging);
                return Err(with_path(&target)(e));
            }
        }

        if let Err(e) = fs::rename(&staging, &target) {
            if replaced {
                // Put the previous state back
                if let Err(restore) = fs::rename(&trash, &target) {
                    tracing::warn!(
                        collection = name,
                        error = %restore,
                        "Could not restore previous collection state"
                    );
                }
            }
            Self::discard(&staging);
            return Err(with_path(&target)(e));
        }

        self.sync_after_rename(name);

        if replaced {
            Self::discard(&trash);
        }

        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let target = self.collections_dir.join(name);
        if !target.is_dir() {
            return Err(Error::CollectionNotFound(name.to_string()));
        }

        let trash = self.collections_dir.join(format!("{TRASH_PREFIX}{name}"));
        if trash.exists() {
            Self::discard(&trash);
        }

        fs::rename(&target, &trash).map_err(with_path(&target))?;
        self.sync_after_rename(name);
        Self::discard(&trash);

        Ok(())
    }

    fn root(&self) -> Option<&Path> {
        Some(self.root.as_path())
    }
}
