//! Error types shared across the workspace.

use thiserror::Error;

/// Result type alias for common operations
pub type CommonResult<T> = std::result::Result<T, CommonError>;

/// Errors raised by the shared types and helpers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A locale tag could not be parsed
    #[error("Invalid locale tag '{tag}': {reason}")]
    InvalidLocaleTag {
        /// The tag as given
        tag: String,
        /// Why it was rejected
        reason: String,
    },

    /// Logging could not be initialized
    #[error("Logging setup failed: {message}")]
    Logging {
        /// Description of the failure
        message: String,
    },
}

impl CommonError {
    /// Create a new locale tag error
    pub fn invalid_locale(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocaleTag {
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Create a new logging error
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}
