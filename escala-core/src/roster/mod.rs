//! Roster logic
//!
//! - [`resolver`] - turns free text into a schedule participant
//! - [`consistency`] - keeps participant snapshots in sync with members

pub mod consistency;
pub mod resolver;
