//! # System Constants
//!
//! Defaults and well-known names shared by configuration, logging and the
//! worker pool.

/// Worker threads per logical processor
pub const DEFAULT_THREADS_PER_PROCESSOR: usize = 2;

/// Prefix of worker thread names when none is configured
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "deployment";

/// Pause before a deferred unit is put back on the queue
pub const DEFAULT_DEFER_BACKOFF_MS: u64 = 1;

pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Checked in order when detecting the environment
pub const ENVIRONMENT_VARIABLES: &[&str] = &["DEPLOYMENT_ENV", "APP_ENV"];

pub const DEFAULT_CONFIG_DIRECTORY: &str = "config";

pub const CONFIG_FILE_STEM: &str = "deployment";

pub const CONFIG_FILE_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Prefix of configuration override variables (`DEPLOYMENT__POOL__...`)
pub const CONFIG_ENV_PREFIX: &str = "DEPLOYMENT";

/// Structured log event names
pub mod events {
    pub const POOL_STARTED: &str = "pool.started";
    pub const POOL_SHUTDOWN: &str = "pool.shutdown";
    pub const PASS_STARTED: &str = "pass.started";
    pub const PASS_COMPLETED: &str = "pass.completed";
    pub const PASS_FAILED: &str = "pass.failed";
    pub const UNIT_COMPLETED: &str = "unit.completed";
    pub const UNIT_DEFERRED: &str = "unit.deferred";
    pub const UNIT_FAILED: &str = "unit.failed";
}
