//! Error types for configuration loading and validation

use msgfmt_common::CommonError;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading, saving or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the configuration file failed
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File the operation targeted
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML syntax or schema error
    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax or schema error
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Serializing the configuration failed
    #[error("Failed to serialize configuration: {message}")]
    Serialize {
        /// Description of the failure
        message: String,
    },

    /// The file extension does not name a supported format
    #[error("Unsupported configuration format for '{path}' (expected .toml, .yaml, .yml or .json)")]
    UnsupportedFormat {
        /// Offending path
        path: String,
    },

    /// A value failed validation
    #[error("Invalid configuration value for '{field}': {message}")]
    Validation {
        /// Dotted path of the field
        field: String,
        /// Why the value was rejected
        message: String,
    },

    /// A locale tag could not be parsed
    #[error(transparent)]
    Locale(#[from] CommonError),
}

impl ConfigError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error for the given path
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
