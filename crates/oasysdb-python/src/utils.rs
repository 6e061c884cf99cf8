//! Utility functions for Python-Rust type conversions.
//!
//! Vectors, metadata, distance metrics and errors cross the binding
//! boundary through the helpers here.

use pyo3::exceptions::{PyIOError, PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString, PyTuple};
use pyo3::IntoPyObjectExt;
use std::collections::BTreeMap;

use oasysdb_core::{DistanceMetric, Error, ErrorKind, Metadata};

/// Extracts a vector from a Python object, supporting both Python lists and
/// NumPy arrays.
///
/// # Errors
///
/// Returns a `ValueError` if the object is neither a list nor a 1-D numpy
/// array of floats.
pub fn extract_vector(obj: &Bound<'_, PyAny>) -> PyResult<Vec<f32>> {
    // Try numpy array first (most common in ML workflows)
    if let Ok(array) = obj.extract::<numpy::PyReadonlyArray1<f32>>() {
        return Ok(array.as_array().iter().copied().collect());
    }

    // Try numpy float64 array and convert
    if let Ok(array) = obj.extract::<numpy::PyReadonlyArray1<f64>>() {
        return Ok(array.as_array().iter().map(|&x| x as f32).collect());
    }

    // Fall back to Python sequence of numbers
    if let Ok(list) = obj.extract::<Vec<f32>>() {
        return Ok(list);
    }

    Err(PyValueError::new_err(
        "Vector must be a Python list or numpy array of floats",
    ))
}

/// Parse a distance metric string into a DistanceMetric enum.
pub fn parse_metric(metric: &str) -> PyResult<DistanceMetric> {
    match metric.to_lowercase().as_str() {
        "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
        "cosine" => Ok(DistanceMetric::Cosine),
        "dot" | "dot_product" | "dotproduct" | "ip" => Ok(DistanceMetric::DotProduct),
        _ => Err(PyValueError::new_err(format!(
            "Invalid metric '{}'. Use 'euclidean', 'cosine', or 'dot'",
            metric
        ))),
    }
}

/// Canonical lowercase name of a metric.
pub fn metric_name(metric: DistanceMetric) -> &'static str {
    match metric {
        DistanceMetric::Euclidean => "euclidean",
        DistanceMetric::Cosine => "cosine",
        DistanceMetric::DotProduct => "dot",
    }
}

/// Convert a Python object to record metadata.
///
/// `bool` is checked before `int`, since Python booleans are integers too.
pub fn python_to_metadata(obj: &Bound<'_, PyAny>) -> PyResult<Metadata> {
    if let Ok(b) = obj.downcast::<PyBool>() {
        return Ok(Metadata::Boolean(b.is_true()));
    }
    if obj.is_instance_of::<PyInt>() {
        return Ok(Metadata::Integer(obj.extract::<i64>()?));
    }
    if let Ok(f) = obj.downcast::<PyFloat>() {
        return Ok(Metadata::Float(f.value()));
    }
    if obj.is_instance_of::<PyString>() {
        return Ok(Metadata::Text(obj.extract::<String>()?));
    }
    if obj.is_instance_of::<PyList>() || obj.is_instance_of::<PyTuple>() {
        let items = obj
            .try_iter()?
            .map(|item| python_to_metadata(&item?))
            .collect::<PyResult<Vec<_>>>()?;
        return Ok(Metadata::Array(items));
    }
    if let Ok(dict) = obj.downcast::<PyDict>() {
        let mut map = BTreeMap::new();
        for (key, value) in dict.iter() {
            let key: String = key
                .extract()
                .map_err(|_| PyValueError::new_err("Metadata keys must be strings"))?;
            map.insert(key, python_to_metadata(&value)?);
        }
        return Ok(Metadata::Object(map));
    }

    Err(PyValueError::new_err(format!(
        "Unsupported metadata type '{}'",
        obj.get_type().name()?
    )))
}

/// Convert record metadata to a Python object.
pub fn metadata_to_python(py: Python<'_>, metadata: &Metadata) -> PyResult<PyObject> {
    match metadata {
        Metadata::Text(s) => s.as_str().into_py_any(py),
        Metadata::Integer(i) => (*i).into_py_any(py),
        Metadata::Float(f) => (*f).into_py_any(py),
        Metadata::Boolean(b) => (*b).into_py_any(py),
        Metadata::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(metadata_to_python(py, item)?)?;
            }
            Ok(list.into_any().unbind())
        }
        Metadata::Object(map) => {
            let dict = PyDict::new(py);
            for (key, value) in map {
                dict.set_item(key.as_str(), metadata_to_python(py, value)?)?;
            }
            Ok(dict.into_any().unbind())
        }
    }
}

/// Map a core error to the matching Python exception.
///
/// Missing collections and records raise `KeyError`, rejected arguments
/// raise `ValueError` and storage failures raise `IOError`.
pub fn to_py_err(err: Error) -> PyErr {
    let message = err.to_string();
    match err.kind() {
        ErrorKind::NotFound => PyKeyError::new_err(message),
        ErrorKind::DuplicateName | ErrorKind::DimensionMismatch | ErrorKind::InvalidInput => {
            PyValueError::new_err(message)
        }
        ErrorKind::Storage => PyIOError::new_err(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metric_aliases() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|_py| {
            assert!(matches!(
                parse_metric("EUCLIDEAN").unwrap(),
                DistanceMetric::Euclidean
            ));
            assert!(matches!(
                parse_metric("l2").unwrap(),
                DistanceMetric::Euclidean
            ));
            assert!(matches!(
                parse_metric("cosine").unwrap(),
                DistanceMetric::Cosine
            ));
            assert!(matches!(
                parse_metric("ip").unwrap(),
                DistanceMetric::DotProduct
            ));
        });
    }

    #[test]
    fn test_parse_metric_invalid() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|_py| {
            assert!(parse_metric("hamming").is_err());
        });
    }

    #[test]
    fn test_metric_name_parses_back() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|_py| {
            for metric in [
                DistanceMetric::Euclidean,
                DistanceMetric::Cosine,
                DistanceMetric::DotProduct,
            ] {
                assert_eq!(parse_metric(metric_name(metric)).unwrap(), metric);
            }
        });
    }

    #[test]
    fn test_error_mapping() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let err = to_py_err(Error::CollectionNotFound("x".into()));
            assert!(err.is_instance_of::<PyKeyError>(py));

            let err = to_py_err(Error::CollectionExists("x".into()));
            assert!(err.is_instance_of::<PyValueError>(py));

            let err = to_py_err(Error::DimensionMismatch {
                expected: 2,
                actual: 3,
            });
            assert!(err.is_instance_of::<PyValueError>(py));

            let err = to_py_err(Error::Corrupted("bad".into()));
            assert!(err.is_instance_of::<PyIOError>(py));
        });
    }

    #[test]
    fn test_metadata_bool_is_not_integer() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let value = true.into_py_any(py).unwrap();
            assert_eq!(
                python_to_metadata(value.bind(py)).unwrap(),
                Metadata::Boolean(true)
            );
        });
    }

    #[test]
    fn test_metadata_roundtrip_through_python() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let metadata = Metadata::from_json(serde_json::json!({
                "title": "doc",
                "views": 3,
                "score": 0.25,
                "tags": ["a", true]
            }))
            .unwrap();

            let obj = metadata_to_python(py, &metadata).unwrap();
            let back = python_to_metadata(obj.bind(py)).unwrap();

            assert_eq!(back, metadata);
        });
    }
}
