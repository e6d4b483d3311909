#![allow(dead_code)]

pub mod model;

pub use model::*;
pub use processors::*;

use deployment_core::{DeploymentConfig, LoggingConfig};
use std::sync::Once;

static LOGGING: Once = Once::new();

/// Route test logs through the crate's subscriber; `RUST_LOG` controls verbosity
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        deployment_core::init_structured_logging(&LoggingConfig {
            level: Some("warn".to_string()),
            json: false,
        });
    });
}

/// Configuration with a fixed processor count and no deferral pause
pub fn test_config(processors: usize) -> DeploymentConfig {
    let mut config = DeploymentConfig::default();
    config.pool.processor_count = Some(processors);
    config.execution.defer_backoff_ms = 0;
    config.execution.environment = "test".to_string();
    config
}
