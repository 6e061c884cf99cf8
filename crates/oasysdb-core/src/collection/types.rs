//! Collection types and configuration.

use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use crate::record::{Record, RecordId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Parameters governing a collection.
///
/// A config is copied into the collection it is attached to; the collection
/// never exposes a way to change it afterwards.
///
/// # Examples
///
/// ```rust
/// use oasysdb::{Config, DistanceMetric};
///
/// let config = Config::new(DistanceMetric::Cosine).with_relevancy(0.8);
/// assert_eq!(config.relevancy, Some(0.8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Distance metric used to score search results.
    pub metric: DistanceMetric,

    /// Optional score threshold for search results.
    ///
    /// Distance metrics keep results at or below it, similarity metrics at
    /// or above it.
    #[serde(default)]
    pub relevancy: Option<f32>,
}

impl Config {
    /// Returns the documented default: Euclidean metric, no threshold.
    #[must_use]
    pub fn create_default() -> Self {
        Self::default()
    }

    /// Creates a config using the given metric and no threshold.
    #[must_use]
    pub const fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            relevancy: None,
        }
    }

    /// Sets the relevancy threshold.
    #[must_use]
    pub const fn with_relevancy(mut self, threshold: f32) -> Self {
        self.relevancy = Some(threshold);
        self
    }

    /// Validates the config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the relevancy threshold is not finite.
    pub fn validate(&self) -> Result<()> {
        match self.relevancy {
            Some(threshold) if !threshold.is_finite() => Err(Error::Config(format!(
                "relevancy threshold {threshold} is not a finite number"
            ))),
            _ => Ok(()),
        }
    }
}

/// A set of records sharing one vector dimension under one config.
///
/// Collections are plain values: they live independently of any database
/// until they are saved into one.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Immutable collection parameters.
    pub(crate) config: Config,

    /// Dimension established by the first inserted record.
    pub(crate) dimension: Option<usize>,

    /// Records keyed by ID.
    pub(crate) records: FxHashMap<RecordId, Record>,

    /// ID handed to the next inserted record.
    pub(crate) next_id: u32,
}
