//! CLDR plural operands of a decimal number.

use crate::error::{MessageFormatError, MessageFormatResult};
use crate::value::is_decimal;

/// Plural operands derived from the textual form of a number.
///
/// `1.50` and `1.5` differ here (`v` is 2 and 1), which is why the context
/// is built from a string and never from a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PluralContext {
    /// Absolute value.
    pub n: f64,
    /// Integer digits, sign kept.
    pub i: i64,
    /// Number of visible fraction digits, trailing zeros included.
    pub v: usize,
    /// Number of visible fraction digits, trailing zeros excluded.
    pub w: usize,
    /// Visible fraction digits as an integer, trailing zeros included.
    pub f: u64,
    /// Visible fraction digits as an integer, trailing zeros excluded.
    pub t: u64,
    /// Compact exponent. Always 0.
    pub c: u32,
    /// Exponent. Always 0.
    pub e: u32,
}

impl PluralContext {
    /// Derives the operands of a decimal string such as `-12.50`.
    ///
    /// # Errors
    ///
    /// [`MessageFormatError::InvalidNumber`] when the text is not a plain
    /// decimal or its digits do not fit the operand types.
    pub fn from_decimal_str(text: &str) -> MessageFormatResult<Self> {
        let trimmed = text.trim();
        if !is_decimal(trimmed) {
            return Err(MessageFormatError::invalid_number(text));
        }

        let negative = trimmed.starts_with('-');
        let unsigned = trimmed.trim_start_matches(['-', '+']);
        let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let magnitude: i64 = integer
            .parse()
            .map_err(|_| MessageFormatError::invalid_number(text))?;
        let n: f64 = unsigned
            .parse()
            .map_err(|_| MessageFormatError::invalid_number(text))?;

        let significant = fraction.trim_end_matches('0');
        let digits = |part: &str| -> MessageFormatResult<u64> {
            if part.is_empty() {
                Ok(0)
            } else {
                part.parse()
                    .map_err(|_| MessageFormatError::invalid_number(text))
            }
        };

        Ok(Self {
            n,
            i: if negative { -magnitude } else { magnitude },
            v: fraction.len(),
            w: significant.len(),
            f: digits(fraction)?,
            t: digits(significant)?,
            c: 0,
            e: 0,
        })
    }

    /// Operands of a whole number.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_integer(value: i64) -> Self {
        Self {
            n: value.unsigned_abs() as f64,
            i: value,
            v: 0,
            w: 0,
            f: 0,
            t: 0,
            c: 0,
            e: 0,
        }
    }
}
