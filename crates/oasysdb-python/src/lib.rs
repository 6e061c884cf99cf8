#![allow(clippy::useless_conversion)]
#![allow(clippy::pedantic)] // PyO3 binding code has many style differences
//! Python bindings for the `OasysDB` vector database.
//!
//! # Example
//!
//! ```python
//! from oasysdb.database import Database
//! from oasysdb.collection import Record, Collection, Config
//!
//! db = Database("./data")
//! records = Record.many_random(dimension=128, len=100)
//! db.create_collection(name="vectors", records=records)
//!
//! collection = db.get_collection(name="vectors")
//! results = collection.search(records[0].vector, n=5)
//!
//! db.save_collection(name="test", collection=Collection(config=Config.create_default()))
//! db.delete_collection(name="vectors")
//! ```

mod collection;
mod record;
mod utils;

pub use collection::{Collection, Config};
pub use record::{Record, SearchResult};

use pyo3::prelude::*;
use std::path::PathBuf;

use oasysdb_core::{Database as CoreDatabase, SaveMode};
use utils::to_py_err;

/// OasysDB Database - a directory of named collections.
///
/// Example:
///     >>> db = Database("./my_data")        # open or create
///     >>> db = Database.new("./fresh_data") # create, fails if not empty
#[pyclass(module = "oasysdb.database")]
pub struct Database {
    inner: CoreDatabase,
}

#[pymethods]
impl Database {
    /// Open or create a database at the specified path.
    ///
    /// Args:
    ///     path: Directory path for database storage
    ///
    /// Raises:
    ///     IOError: If the path is not usable as a database directory
    #[new]
    #[pyo3(signature = (path))]
    fn open(path: PathBuf) -> PyResult<Self> {
        let inner = CoreDatabase::open(path).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Create a new database at the specified path.
    ///
    /// Raises:
    ///     IOError: If the path already holds a database with collections
    #[staticmethod]
    #[pyo3(name = "new", signature = (path))]
    fn create(path: PathBuf) -> PyResult<Self> {
        let inner = CoreDatabase::create(path).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Create a database that lives only in memory.
    #[staticmethod]
    fn in_memory() -> Self {
        Self {
            inner: CoreDatabase::in_memory(),
        }
    }

    /// The data directory, or None for an in-memory database.
    #[getter]
    fn path(&self) -> Option<PathBuf> {
        self.inner.path().map(PathBuf::from)
    }

    /// Create a collection, optionally populated with records.
    ///
    /// Args:
    ///     name: Unique collection name (1-64 of A-Z, a-z, 0-9, '_', '-')
    ///     config: Collection config (default: Config.create_default())
    ///     records: Records to insert
    ///
    /// Raises:
    ///     ValueError: If the name is taken or invalid, or records disagree
    ///         on dimension
    ///
    /// Example:
    ///     >>> db.create_collection(name="vectors", records=Record.many_random(128, 100))
    #[pyo3(signature = (name, config = None, records = None))]
    fn create_collection(
        &self,
        py: Python<'_>,
        name: &str,
        config: Option<Config>,
        records: Option<Vec<Record>>,
    ) -> PyResult<()> {
        let config = config.map(|c| c.inner);
        let records = records.map(|rs| rs.into_iter().map(|r| r.inner).collect());
        py.allow_threads(|| self.inner.create_collection(name, config, records))
            .map_err(to_py_err)
    }

    /// Get a snapshot of a collection by name.
    ///
    /// Raises:
    ///     KeyError: If the collection does not exist
    #[pyo3(signature = (name))]
    fn get_collection(&self, name: &str) -> PyResult<Collection> {
        self.inner
            .get_collection(name)
            .map(Collection::from)
            .map_err(to_py_err)
    }

    /// Save a collection under a name.
    ///
    /// Args:
    ///     name: Collection name
    ///     collection: The collection to save
    ///     overwrite: Replace an existing collection of that name
    ///         (default: False)
    ///
    /// Raises:
    ///     ValueError: If the name is taken and overwrite is False
    #[pyo3(signature = (name, collection, overwrite = false))]
    fn save_collection(
        &self,
        py: Python<'_>,
        name: &str,
        collection: PyRef<'_, Collection>,
        overwrite: bool,
    ) -> PyResult<()> {
        let mode = if overwrite {
            SaveMode::Overwrite
        } else {
            SaveMode::CreateOnly
        };
        let collection = &collection.inner;
        py.allow_threads(|| self.inner.save_collection_with_mode(name, collection, mode))
            .map_err(to_py_err)
    }

    /// Delete a collection by name.
    ///
    /// Raises:
    ///     KeyError: If the collection does not exist
    #[pyo3(signature = (name))]
    fn delete_collection(&self, py: Python<'_>, name: &str) -> PyResult<()> {
        py.allow_threads(|| self.inner.delete_collection(name))
            .map_err(to_py_err)
    }

    /// List all collection names, sorted.
    fn list_collections(&self) -> Vec<String> {
        self.inner.list_collections()
    }

    /// True if a collection with the name exists.
    #[pyo3(signature = (name))]
    fn contains_collection(&self, name: &str) -> bool {
        self.inner.contains_collection(name)
    }

    fn __contains__(&self, name: &str) -> bool {
        self.inner.contains_collection(name)
    }

    /// True if the database holds no collections.
    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of collections.
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        match self.inner.path() {
            Some(path) => format!("Database(path='{}')", path.display()),
            None => "Database(in_memory)".to_string(),
        }
    }
}

/// OasysDB - an embedded vector database.
///
/// Classes live in two submodules, `oasysdb.database` and
/// `oasysdb.collection`, and are re-exported at the top level.
#[pymodule]
fn oasysdb(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();

    let database = PyModule::new(py, "database")?;
    database.add_class::<Database>()?;
    m.add_submodule(&database)?;

    let collection = PyModule::new(py, "collection")?;
    collection.add_class::<Collection>()?;
    collection.add_class::<Config>()?;
    collection.add_class::<Record>()?;
    collection.add_class::<SearchResult>()?;
    m.add_submodule(&collection)?;

    // Make `from oasysdb.database import ...` resolve
    let modules = py.import("sys")?.getattr("modules")?;
    modules.set_item("oasysdb.database", &database)?;
    modules.set_item("oasysdb.collection", &collection)?;

    m.add_class::<Database>()?;
    m.add_class::<Collection>()?;
    m.add_class::<Config>()?;
    m.add_class::<Record>()?;
    m.add_class::<SearchResult>()?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
