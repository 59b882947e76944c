//! Application-wide error types using thiserror.

use msgfmt_common::CommonError;
use msgfmt_config::ConfigError;
use msgfmt_core::MessageFormatError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Formatting error.
    #[error("Formatting error: {0}")]
    Format(#[from] MessageFormatError),

    /// Locale or logging setup error.
    #[error("{0}")]
    Common(#[from] CommonError),

    /// A `NAME=VALUE` argument that could not be bound.
    #[error("Invalid binding '{binding}': {reason}")]
    InvalidBinding {
        /// The argument as given
        binding: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type for the command line application.
pub type CliResult<T> = Result<T, CliError>;
