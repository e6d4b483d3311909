//! Configuration Loader
//!
//! Environment-aware configuration loading built on the `config` crate.
//! Handles file discovery, environment detection, and layering of
//! environment-specific overlays and variables over the base file.

use super::error::{ConfigResult, ConfigurationError};
use super::DeploymentConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_FILE_EXTENSIONS, CONFIG_FILE_STEM, DEFAULT_CONFIG_DIRECTORY,
    DEFAULT_ENVIRONMENT, ENVIRONMENT_VARIABLES,
};
use config::{Config, Environment, File};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Loaded configuration together with where it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: DeploymentConfig,
    environment: String,
    config_directory: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection.
    ///
    /// Reads `./config/deployment.*` when present; a missing directory is not
    /// an error, defaults and environment variables still apply.
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        let directory = PathBuf::from(DEFAULT_CONFIG_DIRECTORY);
        let directory = directory.is_dir().then_some(directory);
        Self::build(directory, &environment, None)
    }

    /// Load configuration from a specific directory; the base file must exist
    pub fn load_from_directory(config_dir: impl Into<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment.
    /// Useful for testing without modifying global environment variables.
    pub fn load_from_directory_with_env(
        config_dir: impl Into<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_dir = config_dir.into();
        Self::find_config_file(&config_dir, CONFIG_FILE_STEM).ok_or_else(|| {
            ConfigurationError::FileNotFound {
                directory: config_dir.display().to_string(),
                looked_for: Self::candidate_names(CONFIG_FILE_STEM),
            }
        })?;

        Self::build(Some(config_dir), environment, None)
    }

    /// Wrap an already-built configuration
    pub fn from_config(config: DeploymentConfig) -> ConfigResult<Arc<ConfigManager>> {
        config.validate()?;
        let environment = config.execution.environment.clone();
        Ok(Arc::new(ConfigManager {
            config,
            environment,
            config_directory: None,
        }))
    }

    fn build(
        config_directory: Option<PathBuf>,
        environment: &str,
        variables: Option<HashMap<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        debug!(
            environment = %environment,
            directory = ?config_directory,
            "Loading deployment configuration"
        );

        let mut builder = Config::builder();

        if let Some(dir) = config_directory.as_deref() {
            if let Some(base) = Self::find_config_file(dir, CONFIG_FILE_STEM) {
                debug!(file = %base.display(), "Using base configuration file");
                builder = builder.add_source(File::from(base));
            }

            let overlay_stem = format!("{CONFIG_FILE_STEM}.{environment}");
            if let Some(overlay) = Self::find_config_file(dir, &overlay_stem) {
                debug!(
                    file = %overlay.display(),
                    "Applying environment-specific overrides for: {}",
                    environment
                );
                builder = builder.add_source(File::from(overlay));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(CONFIG_ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(variables),
        );

        let source_name = config_directory
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "environment".to_string());

        let mut config: DeploymentConfig = builder
            .build()
            .and_then(|raw| raw.try_deserialize())
            .map_err(|e| ConfigurationError::invalid(source_name, e))?;

        config.execution.environment = environment.to_string();
        config.validate()?;

        debug!(
            "Configuration loaded successfully: {}",
            serde_json::to_string(&config).unwrap_or_else(|_| "[serialization error]".to_string())
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> Option<&Path> {
        self.config_directory.as_deref()
    }

    /// Configuration as JSON, for diagnostics
    pub fn debug_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    /// Detect current environment: DEPLOYMENT_ENV || APP_ENV || 'development'
    fn detect_environment() -> String {
        ENVIRONMENT_VARIABLES
            .iter()
            .find_map(|name| env::var(name).ok())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
            .to_lowercase()
    }

    fn find_config_file(config_directory: &Path, stem: &str) -> Option<PathBuf> {
        CONFIG_FILE_EXTENSIONS
            .iter()
            .map(|ext| config_directory.join(format!("{stem}.{ext}")))
            .find(|path| path.is_file())
    }

    fn candidate_names(stem: &str) -> String {
        CONFIG_FILE_EXTENSIONS
            .iter()
            .map(|ext| format!("{stem}.{ext}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
