//! Collection module for OasysDB Python bindings.
//!
//! This module contains the `Collection` and `Config` classes exposed as
//! `oasysdb.collection`.

use pyo3::prelude::*;

use crate::record::{Record, SearchResult};
use crate::utils::{extract_vector, metric_name, parse_metric, to_py_err};
use oasysdb_core::{Collection as CoreCollection, Config as CoreConfig, RecordId};

/// Parameters governing a collection.
///
/// Example:
///     >>> config = Config.create_default()
///     >>> config = Config(metric="cosine", relevancy=0.8)
#[pyclass(module = "oasysdb.collection")]
#[derive(Clone)]
pub struct Config {
    pub(crate) inner: CoreConfig,
}

#[pymethods]
impl Config {
    /// Create a config.
    ///
    /// Args:
    ///     metric: "euclidean", "cosine" or "dot" (default: "euclidean")
    ///     relevancy: Optional score threshold for search results
    #[new]
    #[pyo3(signature = (metric = "euclidean", relevancy = None))]
    fn new(metric: &str, relevancy: Option<f32>) -> PyResult<Self> {
        let mut inner = CoreConfig::new(parse_metric(metric)?);
        if let Some(threshold) = relevancy {
            inner = inner.with_relevancy(threshold);
        }
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// The default config: Euclidean metric, no relevancy threshold.
    #[staticmethod]
    fn create_default() -> Self {
        Self {
            inner: CoreConfig::create_default(),
        }
    }

    /// Distance metric name.
    #[getter]
    fn metric(&self) -> &'static str {
        metric_name(self.inner.metric)
    }

    /// Relevancy threshold, or None.
    #[getter]
    fn relevancy(&self) -> Option<f32> {
        self.inner.relevancy
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.inner == other.inner
    }

    fn __repr__(&self) -> String {
        match self.inner.relevancy {
            Some(threshold) => format!(
                "Config(metric='{}', relevancy={threshold})",
                metric_name(self.inner.metric)
            ),
            None => format!("Config(metric='{}')", metric_name(self.inner.metric)),
        }
    }
}

/// A set of records sharing one dimension.
///
/// Collections are independent values until saved into a Database; a
/// collection returned by `Database.get_collection` is a snapshot.
///
/// Example:
///     >>> collection = Collection(config=Config.create_default())
///     >>> collection.insert(Record([0.1, 0.2]))
///     0
#[pyclass(module = "oasysdb.collection")]
pub struct Collection {
    pub(crate) inner: CoreCollection,
}

impl From<CoreCollection> for Collection {
    fn from(inner: CoreCollection) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl Collection {
    /// Create an empty collection.
    ///
    /// Args:
    ///     config: Collection config (default: Config.create_default())
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<Config>) -> PyResult<Self> {
        let config = config.map_or_else(CoreConfig::create_default, |c| c.inner);
        config.validate().map_err(to_py_err)?;
        Ok(CoreCollection::new(config).into())
    }

    /// Create a collection pre-populated with records.
    ///
    /// Raises:
    ///     ValueError: If the records disagree on dimension
    #[staticmethod]
    #[pyo3(signature = (config, records))]
    fn build(config: Config, records: Vec<Record>) -> PyResult<Self> {
        let records = records.into_iter().map(|r| r.inner).collect();
        CoreCollection::build(config.inner, records)
            .map(Self::from)
            .map_err(to_py_err)
    }

    /// The collection config.
    #[getter]
    fn config(&self) -> Config {
        Config {
            inner: *self.inner.config(),
        }
    }

    /// The vector dimension, or None before the first insert.
    #[getter]
    fn dimension(&self) -> Option<usize> {
        self.inner.dimension()
    }

    /// Number of records.
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// True if the collection holds no records.
    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Insert a record and return its ID.
    ///
    /// Raises:
    ///     ValueError: If the vector is invalid or has the wrong dimension
    #[pyo3(signature = (record))]
    fn insert(&mut self, record: Record) -> PyResult<u32> {
        self.inner
            .insert(record.inner)
            .map(|id| id.0)
            .map_err(to_py_err)
    }

    /// Insert records and return their IDs. Nothing is inserted on error.
    #[pyo3(signature = (records))]
    fn insert_many(&mut self, records: Vec<Record>) -> PyResult<Vec<u32>> {
        let records = records.into_iter().map(|r| r.inner).collect();
        self.inner
            .insert_many(records)
            .map(|ids| ids.into_iter().map(|id| id.0).collect())
            .map_err(to_py_err)
    }

    /// Get a record by ID.
    ///
    /// Raises:
    ///     KeyError: If no such record exists
    #[pyo3(signature = (id))]
    fn get(&self, id: u32) -> PyResult<Record> {
        self.inner
            .get(RecordId(id))
            .map(|record| record.clone().into())
            .map_err(to_py_err)
    }

    /// True if a record with the ID exists.
    #[pyo3(signature = (id))]
    fn contains(&self, id: u32) -> bool {
        self.inner.contains(RecordId(id))
    }

    fn __contains__(&self, id: u32) -> bool {
        self.inner.contains(RecordId(id))
    }

    /// Replace the record stored under an ID.
    #[pyo3(signature = (id, record))]
    fn update(&mut self, id: u32, record: Record) -> PyResult<()> {
        self.inner
            .update(RecordId(id), record.inner)
            .map_err(to_py_err)
    }

    /// Delete a record by ID.
    #[pyo3(signature = (id))]
    fn delete(&mut self, id: u32) -> PyResult<()> {
        self.inner.delete(RecordId(id)).map_err(to_py_err)
    }

    /// All records as (id, record) pairs ordered by ID.
    fn list(&self) -> Vec<(u32, Record)> {
        self.inner
            .list()
            .into_iter()
            .map(|(id, record)| (id.0, record.clone().into()))
            .collect()
    }

    /// Find the `n` records nearest to a query vector.
    ///
    /// Args:
    ///     vector: Query as a list or numpy array
    ///     n: Number of results (default: 10)
    ///
    /// Returns:
    ///     List of SearchResult, best first
    ///
    /// Example:
    ///     >>> results = collection.search([0.1, 0.2], n=5)
    #[pyo3(signature = (vector, n = 10))]
    fn search(
        &self,
        py: Python<'_>,
        vector: &Bound<'_, PyAny>,
        n: usize,
    ) -> PyResult<Vec<SearchResult>> {
        let query = extract_vector(vector)?;
        let results = py
            .allow_threads(|| self.inner.search(&query, n))
            .map_err(to_py_err)?;
        Ok(results.into_iter().map(SearchResult::from).collect())
    }

    fn __repr__(&self) -> String {
        format!(
            "Collection(len={}, dimension={:?})",
            self.inner.len(),
            self.inner.dimension()
        )
    }
}
