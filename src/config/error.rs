//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    #[error("Configuration file not found in {directory}: looked for {looked_for}")]
    FileNotFound {
        directory: String,
        looked_for: String,
    },

    #[error("Invalid configuration in {source_name}: {message}")]
    Invalid {
        source_name: String,
        message: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    Validation { field: String, message: String },
}

impl ConfigurationError {
    pub fn invalid(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Invalid {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
