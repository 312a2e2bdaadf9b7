//! Session and authentication gate

mod gate;

pub use gate::{AuthGate, AuthOutcome};
