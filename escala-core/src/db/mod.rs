//! Persistence layer
//!
//! A single redb state file holds a flat key-value document with
//! JSON-serialized aggregates, much like a browser's localStorage.
//! [`defaults`] holds the built-in dataset used whenever a key is
//! missing or unreadable.

pub mod defaults;
pub mod storage;

pub use storage::{StateDocument, StateStorage, StorageError, StorageResult, keys};
