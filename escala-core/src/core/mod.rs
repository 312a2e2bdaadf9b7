//! 核心模块 - 配置、状态和错误定义
//!
//! - [`Config`] - application configuration
//! - [`AppState`] - service wiring (storage, store, engines)
//! - [`AppError`] - application error type

pub mod config;
pub mod error;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
