//! Collection lifecycle methods (new, build, restore, size queries).

use crate::collection::types::{Collection, Config};
use crate::error::{Error, Result};
use crate::record::{Record, RecordId};
use rustc_hash::FxHashMap;

impl Collection {
    /// Creates an empty collection with the given config.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dimension: None,
            records: FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Creates a collection pre-populated with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, if any record has an
    /// invalid vector, or if the records disagree on dimension.
    pub fn build(config: Config, records: Vec<Record>) -> Result<Self> {
        config.validate()?;
        let mut collection = Self::new(config);
        collection.insert_many(records)?;
        Ok(collection)
    }

    /// Rebuilds a collection from persisted parts.
    ///
    /// Every inconsistency is reported as [`Error::Corrupted`], since the
    /// parts come from files this crate wrote itself.
    pub(crate) fn from_parts(
        config: Config,
        dimension: Option<usize>,
        next_id: u32,
        records: Vec<(RecordId, Record)>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::Corrupted(format!("collection config: {e}")))?;

        if dimension.is_none() && !records.is_empty() {
            return Err(Error::Corrupted(
                "records present without a dimension".to_string(),
            ));
        }

        let mut map = FxHashMap::with_capacity_and_hasher(records.len(), Default::default());
        for (id, record) in records {
            if id.0 >= next_id {
                return Err(Error::Corrupted(format!(
                    "record {id} is not below next id {next_id}"
                )));
            }
            if Some(record.dimension()) != dimension || record.validate().is_err() {
                return Err(Error::Corrupted(format!("record {id} has an invalid vector")));
            }
            if map.insert(id, record).is_some() {
                return Err(Error::Corrupted(format!("record {id} appears twice")));
            }
        }

        Ok(Self {
            config,
            dimension,
            records: map,
            next_id,
        })
    }

    /// Returns the collection config.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the vector dimension, or `None` before the first insert.
    ///
    /// The dimension is kept even if every record is later deleted.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Returns the number of records in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the collection holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// ID the next inserted record will receive.
    pub(crate) fn next_id(&self) -> u32 {
        self.next_id
    }
}
