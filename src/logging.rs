//! # Structured Logging Module
//!
//! Environment-aware structured logging for deployment passes. Worker threads
//! are named, so thread names are included in every record.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;
use crate::constants::{DEFAULT_ENVIRONMENT, ENVIRONMENT_VARIABLES};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging.
///
/// Filter precedence: `RUST_LOG`, then `config.level`, then the environment
/// default. Safe to call more than once; an already-installed global
/// subscriber is left in place.
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let directive = config
            .level
            .clone()
            .unwrap_or_else(|| get_log_level(&environment).to_string());
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

        let layer = if config.json {
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized, keeping it");
        }

        tracing::info!(
            environment = %environment,
            filter = %directive,
            json = config.json,
            "STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    ENVIRONMENT_VARIABLES
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for a deployment pass
pub fn log_pass_operation(
    operation: &str,
    pass_name: &str,
    context: &str,
    units: usize,
    status: &str,
    duration_ms: Option<u64>,
) {
    tracing::info!(
        operation = %operation,
        pass = %pass_name,
        context = %context,
        units = units,
        status = %status,
        duration_ms = duration_ms,
        timestamp = %Utc::now().to_rfc3339(),
        "DEPLOY: PASS_OPERATION"
    );
}

/// Log structured data for a single unit; debug level, units are numerous
pub fn log_unit_operation(operation: &str, pass_name: &str, unit: &str, details: Option<&str>) {
    tracing::debug!(
        operation = %operation,
        pass = %pass_name,
        unit = %unit,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "DEPLOY: UNIT_OPERATION"
    );
}
