//! CRUD operations for Collection (insert, get, update, delete).

use crate::collection::types::Collection;
use crate::error::{Error, Result};
use crate::record::{Record, RecordId};

impl Collection {
    /// Inserts a record and returns its newly assigned ID.
    ///
    /// The first insert into an empty collection establishes its dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVector`] for an empty or non-finite vector,
    /// [`Error::DimensionMismatch`] if the dimension differs from the
    /// collection's, or [`Error::LimitExceeded`] when IDs are exhausted.
    pub fn insert(&mut self, record: Record) -> Result<RecordId> {
        let ids = self.insert_many(vec![record])?;
        Ok(ids[0])
    }

    /// Inserts records and returns their IDs in input order.
    ///
    /// All records are validated before any is inserted, so on error the
    /// collection is unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`Collection::insert`].
    pub fn insert_many(&mut self, records: Vec<Record>) -> Result<Vec<RecordId>> {
        let mut dimension = self.dimension;
        for record in &records {
            record.validate()?;
            let expected = *dimension.get_or_insert(record.dimension());
            if record.dimension() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: record.dimension(),
                });
            }
        }

        let end = u32::try_from(records.len())
            .ok()
            .and_then(|count| self.next_id.checked_add(count))
            .ok_or_else(|| Error::LimitExceeded("record IDs exhausted".to_string()))?;

        let first = self.next_id;
        self.next_id = end;
        self.dimension = dimension;
        self.records.reserve(records.len());

        let ids: Vec<RecordId> = (first..end).map(RecordId).collect();
        for (id, record) in ids.iter().zip(records) {
            self.records.insert(*id, record);
        }

        Ok(ids)
    }

    /// Returns the record with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no such record exists.
    pub fn get(&self, id: RecordId) -> Result<&Record> {
        self.records.get(&id).ok_or(Error::RecordNotFound(id.0))
    }

    /// Returns true if a record with the given ID exists.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Replaces the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no such record exists, or a
    /// validation error as for [`Collection::insert`].
    pub fn update(&mut self, id: RecordId, record: Record) -> Result<()> {
        if !self.records.contains_key(&id) {
            return Err(Error::RecordNotFound(id.0));
        }

        record.validate()?;
        if let Some(expected) = self.dimension {
            if record.dimension() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: record.dimension(),
                });
            }
        }

        self.records.insert(id, record);
        Ok(())
    }

    /// Removes the record with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no such record exists.
    pub fn delete(&mut self, id: RecordId) -> Result<()> {
        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::RecordNotFound(id.0))
    }

    /// Returns every record ordered by ID.
    #[must_use]
    pub fn list(&self) -> Vec<(RecordId, &Record)> {
        let mut records: Vec<(RecordId, &Record)> =
            self.records.iter().map(|(id, record)| (*id, record)).collect();
        records.sort_unstable_by_key(|(id, _)| *id);
        records
    }
}
