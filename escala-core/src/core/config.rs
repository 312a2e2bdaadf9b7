//! Application configuration
//!
//! # 环境变量
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/escala | work directory (state file, logs) |
//! | LOG_LEVEL | info | tracing filter level |
//! | LOG_DIR | (unset) | daily rolling log files when set |

use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the state file and log files
    pub work_dir: String,
    /// Log level: trace | debug | info | warn | error
    pub log_level: String,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/escala".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Configuration rooted at an explicit work directory (tests, embedding).
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            log_level: "info".into(),
            log_dir: None,
        }
    }

    /// Path of the redb state file.
    pub fn state_file(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("escala.redb")
    }

    /// Make sure the work directory exists.
    pub fn ensure_work_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
