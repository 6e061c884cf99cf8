//! Core Collection implementation (Lifecycle & CRUD).
//!
//! - Lifecycle: new, build, restore from persisted parts
//! - CRUD: insert, get, update, delete, list

mod crud;
mod lifecycle;
