//! Error types for message formatting.

use msgfmt_common::escape_snippet;
use thiserror::Error;

/// Result type for formatting operations
pub type MessageFormatResult<T> = std::result::Result<T, MessageFormatError>;

/// Errors raised while scanning, parsing or formatting a message pattern
///
/// Every error aborts the whole call. Parser errors carry the 1-based line
/// and column of the offending character.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageFormatError {
    /// The pattern contains a different number of `{` and `}`
    #[error("Unbalanced braces: {open_count} opening and {close_count} closing")]
    UnbalancedBraces {
        /// Total `{` outside escapes
        open_count: usize,
        /// Total `}` outside escapes
        close_count: usize,
    },

    /// Pattern text that cannot be scanned or parsed
    #[error("{message} at line {line}, column {column}: '{snippet}'")]
    MalformedLiteral {
        /// What went wrong
        message: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Text around the problem
        snippet: String,
    },

    /// Unexpected character in a plural rule
    #[error("Invalid character '{character}' at position {position} in plural rule '{rule}'")]
    InvalidCharacter {
        /// The character found
        character: char,
        /// Byte offset in the rule text
        position: usize,
        /// The rule text
        rule: String,
    },

    /// A plural rule ended early or is otherwise unusable
    #[error("Invalid plural rule '{rule}': {message}")]
    InvalidPluralRule {
        /// The rule text
        rule: String,
        /// What went wrong
        message: String,
    },

    /// A value that must be a finite decimal number is not one
    #[error("Invalid number '{value}'")]
    InvalidNumber {
        /// The offending text
        value: String,
    },

    /// A variable required by its formatter is not bound
    #[error("Variable '{variable_name}' not found in arguments")]
    VariableNotFound {
        /// Name from the placeholder
        variable_name: String,
    },

    /// No registered formatter accepts the placeholder
    #[error("No formatter found for '{formatter_name}' at line {line}, column {column}")]
    FormatterNotFound {
        /// Formatter name from the placeholder, empty for plain variables
        formatter_name: String,
        /// 1-based line of the placeholder
        line: usize,
        /// 1-based column of the placeholder
        column: usize,
    },

    /// A number, date or time style token is not recognized
    #[error("Unsupported style '{style}' for formatter '{formatter}'")]
    UnsupportedFormatStyle {
        /// Formatter name
        formatter: String,
        /// Style token as written
        style: String,
    },

    /// A formatter could not produce output
    #[error("Formatter error: {message}")]
    Formatter {
        /// Description of the failure
        message: String,
    },
}

impl MessageFormatError {
    /// Create a new malformed literal error
    ///
    /// Control characters in the snippet are escaped so it stays on one line.
    pub fn malformed(
        message: impl Into<String>,
        line: usize,
        column: usize,
        snippet: impl Into<String>,
    ) -> Self {
        Self::MalformedLiteral {
            message: message.into(),
            line,
            column,
            snippet: escape_snippet(&snippet.into()),
        }
    }

    /// Create a new invalid plural rule error
    pub fn invalid_rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPluralRule {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid number error
    pub fn invalid_number(value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            value: value.into(),
        }
    }

    /// Create a new variable not found error
    pub fn variable_not_found(variable_name: impl Into<String>) -> Self {
        Self::VariableNotFound {
            variable_name: variable_name.into(),
        }
    }

    /// Create a new generic formatter error
    pub fn formatter(message: impl Into<String>) -> Self {
        Self::Formatter {
            message: message.into(),
        }
    }

    /// Create a new unsupported style error
    pub fn unsupported_style(formatter: impl Into<String>, style: impl Into<String>) -> Self {
        Self::UnsupportedFormatStyle {
            formatter: formatter.into(),
            style: style.into(),
        }
    }

    /// Whether the error came from reading pattern text rather than formatting values
    pub const fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::UnbalancedBraces { .. }
                | Self::MalformedLiteral { .. }
                | Self::InvalidCharacter { .. }
                | Self::InvalidPluralRule { .. }
        )
    }
}
