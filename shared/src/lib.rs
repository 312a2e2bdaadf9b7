//! Shared domain models for the Escala roster application.
//!
//! Everything that describes the persisted document lives here:
//! members, user accounts, schedule groups and their participants.
//! The serde shape is camelCase so the stored JSON matches the
//! document layout the UI layer reads.

pub mod models;
pub mod util;

pub use models::*;
