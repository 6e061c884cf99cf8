//! Record and search result types for the Python bindings.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::utils::{extract_vector, metadata_to_python, python_to_metadata, to_py_err};
use oasysdb_core::{Record as CoreRecord, SearchResult as CoreSearchResult};

/// A vector with optional metadata.
///
/// Example:
///     >>> record = Record([0.1, 0.2, 0.3], data={"title": "Doc"})
///     >>> records = Record.many_random(dimension=128, len=100)
#[pyclass(module = "oasysdb.collection")]
#[derive(Clone)]
pub struct Record {
    pub(crate) inner: CoreRecord,
}

impl From<CoreRecord> for Record {
    fn from(inner: CoreRecord) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl Record {
    /// Create a record.
    ///
    /// Args:
    ///     vector: List or numpy array of floats
    ///     data: Optional metadata (str, int, float, bool, list or dict)
    ///
    /// Raises:
    ///     ValueError: If the vector is empty or holds non-finite numbers
    #[new]
    #[pyo3(signature = (vector, data = None))]
    fn new(vector: &Bound<'_, PyAny>, data: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let vector = extract_vector(vector)?;
        let data = match data {
            Some(obj) if !obj.is_none() => Some(python_to_metadata(obj)?),
            _ => None,
        };

        let inner = CoreRecord::new(vector, data);
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Generate a record with components drawn uniformly from [0, 1).
    #[staticmethod]
    #[pyo3(signature = (dimension))]
    fn random(dimension: usize) -> PyResult<Self> {
        check_dimension(dimension)?;
        Ok(CoreRecord::random(dimension).into())
    }

    /// Generate `len` random records of the given dimension.
    ///
    /// Raises:
    ///     ValueError: If dimension is 0
    ///
    /// Example:
    ///     >>> records = Record.many_random(dimension=128, len=100)
    ///     >>> len(records)
    ///     100
    #[staticmethod]
    #[pyo3(signature = (dimension, len))]
    fn many_random(dimension: usize, len: usize) -> PyResult<Vec<Self>> {
        check_dimension(dimension)?;
        Ok(CoreRecord::many_random(dimension, len)
            .into_iter()
            .map(Self::from)
            .collect())
    }

    /// Generate `len` reproducible random records from `seed`.
    #[staticmethod]
    #[pyo3(signature = (dimension, len, seed))]
    fn many_random_seeded(dimension: usize, len: usize, seed: u64) -> PyResult<Vec<Self>> {
        check_dimension(dimension)?;
        Ok(CoreRecord::many_random_seeded(dimension, len, seed)
            .into_iter()
            .map(Self::from)
            .collect())
    }

    /// The vector as a list of floats.
    #[getter]
    fn vector(&self) -> Vec<f32> {
        self.inner.vector.clone()
    }

    /// The metadata, or None.
    #[getter]
    fn data(&self, py: Python<'_>) -> PyResult<PyObject> {
        match &self.inner.data {
            Some(metadata) => metadata_to_python(py, metadata),
            None => Ok(py.None()),
        }
    }

    /// Number of vector components.
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.inner == other.inner
    }

    fn __repr__(&self) -> String {
        format!(
            "Record(dimension={}, data={})",
            self.inner.dimension(),
            if self.inner.data.is_some() { "..." } else { "None" }
        )
    }
}

fn check_dimension(dimension: usize) -> PyResult<()> {
    if dimension == 0 {
        return Err(PyValueError::new_err("dimension must be at least 1"));
    }
    Ok(())
}

/// Search result from a vector query.
#[pyclass(module = "oasysdb.collection")]
pub struct SearchResult {
    /// Record ID
    #[pyo3(get)]
    id: u32,
    /// Distance or similarity, depending on the metric
    #[pyo3(get)]
    score: f32,
    record: CoreRecord,
}

impl From<CoreSearchResult> for SearchResult {
    fn from(result: CoreSearchResult) -> Self {
        Self {
            id: result.id.0,
            score: result.score,
            record: result.record,
        }
    }
}

#[pymethods]
impl SearchResult {
    /// The matching record.
    #[getter]
    fn record(&self) -> Record {
        self.record.clone().into()
    }

    /// The matching record's metadata, or None.
    #[getter]
    fn data(&self, py: Python<'_>) -> PyResult<PyObject> {
        match &self.record.data {
            Some(metadata) => metadata_to_python(py, metadata),
            None => Ok(py.None()),
        }
    }

    fn __repr__(&self) -> String {
        format!("SearchResult(id={}, score={})", self.id, self.score)
    }
}
