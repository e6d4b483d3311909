//! # Deployment Configuration
//!
//! Typed configuration for deployment passes: worker pool sizing, deferral
//! limits for units waiting on other units, and logging output.
//!
//! ## Sources
//!
//! - **Defaults**: every field has a default, so an empty configuration is valid
//! - **Files**: `deployment.{toml,yaml,json}` plus an optional
//!   `deployment.<environment>` overlay, see [`ConfigManager`]
//! - **Environment variables**: `DEPLOYMENT__POOL__THREADS_PER_PROCESSOR=4` style
//!   overrides applied last
//!
//! ## Usage
//!
//! ```rust,no_run
//! use deployment_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let threads = manager.config().pool.threads_per_processor;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DEFAULT_DEFER_BACKOFF_MS, DEFAULT_ENVIRONMENT, DEFAULT_THREADS_PER_PROCESSOR,
    DEFAULT_THREAD_NAME_PREFIX,
};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Worker pool sizing and thread naming
    pub pool: PoolConfig,

    /// Per-pass execution settings
    pub execution: ExecutionConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

impl DeploymentConfig {
    /// Validate cross-field constraints that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pool.threads_per_processor == 0 {
            return Err(ConfigurationError::validation(
                "pool.threads_per_processor",
                "must be at least 1",
            ));
        }

        if self.pool.processor_count == Some(0) {
            return Err(ConfigurationError::validation(
                "pool.processor_count",
                "must be at least 1 when set",
            ));
        }

        if self.pool.thread_name_prefix.trim().is_empty() {
            return Err(ConfigurationError::validation(
                "pool.thread_name_prefix",
                "must not be blank",
            ));
        }

        if self.execution.max_deferrals == Some(0) {
            return Err(ConfigurationError::validation(
                "execution.max_deferrals",
                "must be at least 1 when set",
            ));
        }

        Ok(())
    }
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PoolConfig {
    /// Worker threads started per logical processor
    pub threads_per_processor: usize,

    /// Overrides processor detection when set
    pub processor_count: Option<usize>,

    /// Prefix of worker thread names; threads are named `<prefix>-<n>`
    pub thread_name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads_per_processor: DEFAULT_THREADS_PER_PROCESSOR,
            processor_count: None,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }
}

/// Execution configuration for a single deployment pass
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExecutionConfig {
    /// How many times one unit may defer before its task fails; unbounded
    /// when unset
    pub max_deferrals: Option<u32>,

    /// Pause before a deferred unit is re-queued
    pub defer_backoff_ms: u64,

    /// Environment name, filled in by the loader
    pub environment: String,
}

impl ExecutionConfig {
    pub fn defer_backoff(&self) -> Duration {
        Duration::from_millis(self.defer_backoff_ms)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_deferrals: None,
            defer_backoff_ms: DEFAULT_DEFER_BACKOFF_MS,
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g. `debug`, `deployment_core=trace`); `RUST_LOG` wins
    pub level: Option<String>,

    /// Emit JSON records instead of human-readable lines
    pub json: bool,
}
