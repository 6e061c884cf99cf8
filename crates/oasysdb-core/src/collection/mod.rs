//! Collection management for `OasysDB`.
//!
//! A collection is a container for records (vectors with optional
//! metadata) sharing a single dimension, providing CRUD operations and
//! exact nearest-neighbour search.

mod core;
pub mod search;
mod types;


pub use types::{Collection, Config};
