//! Data models
//!
//! Shared between the store, the engines and the persistence layer.
//! All structs serialize as camelCase so the redb document keeps the
//! exact JSON shape described in the storage contract.

pub mod member;
pub mod schedule;
pub mod user;

// Re-exports
pub use member::*;
pub use schedule::*;
pub use user::*;
