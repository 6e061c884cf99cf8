//! Record data structure representing a vector with metadata.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::metadata::Metadata;

/// Identifier assigned to a record by its collection.
///
/// IDs increase with every insertion and are never reused within a
/// collection, even after the record is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u32);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A record in a collection.
///
/// A record consists of:
/// - A vector (embedding)
/// - Optional metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The vector embedding.
    pub vector: Vec<f32>,

    /// Optional metadata.
    #[serde(default)]
    pub data: Option<Metadata>,
}

impl Record {
    /// Creates a new record with the given vector and optional metadata.
    #[must_use]
    pub fn new(vector: Vec<f32>, data: Option<Metadata>) -> Self {
        Self { vector, data }
    }

    /// Creates a new record without metadata.
    #[must_use]
    pub fn without_data(vector: Vec<f32>) -> Self {
        Self::new(vector, None)
    }

    /// Returns the dimension of the vector.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    /// Checks that the vector is non-empty and holds only finite numbers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVector`] otherwise.
    pub fn validate(&self) -> Result<()> {
        if self.vector.is_empty() {
            return Err(Error::InvalidVector("vector is empty".to_string()));
        }

        if let Some(index) = self.vector.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidVector(format!(
                "component {index} is not a finite number"
            )));
        }

        Ok(())
    }

    /// Generates a record with `dimension` components drawn uniformly from
    /// `[0, 1)` and a random `Float` metadata value.
    ///
    /// `dimension` must be at least 1; a zero-dimension record fails
    /// [`Record::validate`] and is rejected by every collection.
    #[must_use]
    pub fn random(dimension: usize) -> Self {
        random_record(&mut rand::thread_rng(), dimension)
    }

    /// Generates `len` random records of the given dimension.
    ///
    /// See [`Record::random`] for the requirement on `dimension`.
    #[must_use]
    pub fn many_random(dimension: usize, len: usize) -> Vec<Self> {
        let mut rng = rand::thread_rng();
        (0..len).map(|_| random_record(&mut rng, dimension)).collect()
    }

    /// Generates `len` random records from a fixed seed.
    ///
    /// The same seed always yields the same records.
    #[must_use]
    pub fn many_random_seeded(dimension: usize, len: usize, seed: u64) -> Vec<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len).map(|_| random_record(&mut rng, dimension)).collect()
    }
}

fn random_record<R: Rng>(rng: &mut R, dimension: usize) -> Record {
    let vector = (0..dimension).map(|_| rng.gen::<f32>()).collect();
    let data = Metadata::Float(rng.gen::<f64>());
    Record::new(vector, Some(data))
}

/// A search result containing a record and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// ID of the matching record.
    pub id: RecordId,

    /// The matching record.
    pub record: Record,

    /// Score (distance or similarity, depending on the metric).
    pub score: f32,
}

impl SearchResult {
    /// Creates a new search result.
    #[must_use]
    pub const fn new(id: RecordId, record: Record, score: f32) -> Self {
        Self { id, record, score }
    }
}
