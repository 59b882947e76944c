//! Argument values bound to message placeholders.

use crate::error::{MessageFormatError, MessageFormatResult};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;

/// Arguments for one formatting call, keyed by variable name.
///
/// A key mapped to `None` is present but null.
pub type MessageArgs = HashMap<String, Option<Value>>;

/// A value bound to a placeholder variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text
    Str(String),
    /// Whole number
    Int(i64),
    /// Binary floating point number
    Float(f64),
    /// Exact decimal kept in its textual form, e.g. `"1.50"`
    Decimal(String),
    /// Boolean
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time without zone
    DateTime(NaiveDateTime),
}

impl Value {
    /// Creates an exact decimal value.
    pub fn decimal(text: impl Into<String>) -> Self {
        Self::Decimal(text.into())
    }

    /// Name of the value kind, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Bool(_) => "boolean",
            Self::Date(_) => "date",
            Self::DateTime(_) => "date-time",
        }
    }

    /// Key compared against select branch keys.
    pub fn as_key(&self) -> String {
        self.to_string()
    }

    /// Decimal text of a numeric value.
    ///
    /// Strings are accepted when they hold a decimal number. Other kinds fail
    /// with a formatter error, non-finite or non-numeric text with
    /// [`MessageFormatError::InvalidNumber`].
    pub fn to_decimal_string(&self) -> MessageFormatResult<String> {
        match self {
            Self::Int(value) => Ok(value.to_string()),
            Self::Float(value) if value.is_finite() => Ok(value.to_string()),
            Self::Float(value) => Err(MessageFormatError::invalid_number(value.to_string())),
            Self::Decimal(text) | Self::Str(text) => {
                let trimmed = text.trim();
                if is_decimal(trimmed) {
                    Ok(trimmed.to_string())
                } else {
                    Err(MessageFormatError::invalid_number(text.clone()))
                }
            }
            other => Err(MessageFormatError::formatter(format!(
                "expected a number but got a {} value",
                other.kind()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(text) | Self::Decimal(text) => f.write_str(text),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

/// Whether `text` is a plain decimal: optional sign, digits, optional
/// fraction. No exponent, no grouping.
pub fn is_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    !integer.is_empty()
        && integer.bytes().all(|b| b.is_ascii_digit())
        && fraction.map_or(true, |f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

/// Conversion used by [`message_args!`](crate::message_args) so that both
/// plain values and `Option`s can be bound.
pub trait IntoArgValue {
    /// Converts into an argument slot.
    fn into_arg_value(self) -> Option<Value>;
}

macro_rules! impl_into_arg_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoArgValue for $ty {
                fn into_arg_value(self) -> Option<Value> {
                    Some(Value::from(self))
                }
            }

            impl IntoArgValue for Option<$ty> {
                fn into_arg_value(self) -> Option<Value> {
                    self.map(Value::from)
                }
            }
        )*
    };
}

impl_into_arg_value!(&str, String, i64, i32, u32, f64, bool, NaiveDate, NaiveDateTime);

impl IntoArgValue for Value {
    fn into_arg_value(self) -> Option<Value> {
        Some(self)
    }
}

impl IntoArgValue for Option<Value> {
    fn into_arg_value(self) -> Option<Value> {
        self
    }
}

/// Builds [`MessageArgs`](crate::MessageArgs) from `name => value` pairs.
///
/// ```
/// use msgfmt_core::{message_args, Value};
///
/// let args = message_args! {
///     "name" => "Jeff",
///     "messages" => 123,
///     "missing" => None::<Value>,
/// };
/// assert_eq!(args.len(), 3);
/// assert_eq!(args["missing"], None);
/// ```
#[macro_export]
macro_rules! message_args {
    () => {
        $crate::MessageArgs::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::MessageArgs::new();
        $(
            args.insert(
                ::std::string::ToString::to_string(&$name),
                $crate::IntoArgValue::into_arg_value($value),
            );
        )+
        args
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_decimal() {
        for ok in ["0", "123", "-5", "+7", "1.50", "-0.001"] {
            assert!(is_decimal(ok), "{ok}");
        }
        for bad in ["", "-", "1.", ".5", "1e3", "1,000", "abc", "1.2.3", " 1"] {
            assert!(!is_decimal(bad), "{bad}");
        }
    }

    #[test]
    fn test_to_decimal_string() {
        assert_eq!(Value::Int(-3).to_decimal_string().unwrap(), "-3");
        assert_eq!(Value::Float(1.5).to_decimal_string().unwrap(), "1.5");
        assert_eq!(Value::Float(2.0).to_decimal_string().unwrap(), "2");
        assert_eq!(Value::decimal("1.50").to_decimal_string().unwrap(), "1.50");
        assert_eq!(Value::from(" 42 ").to_decimal_string().unwrap(), "42");

        assert!(matches!(
            Value::Float(f64::NAN).to_decimal_string(),
            Err(MessageFormatError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Value::from("many").to_decimal_string(),
            Err(MessageFormatError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Value::Bool(true).to_decimal_string(),
            Err(MessageFormatError::Formatter { .. })
        ));
    }

    #[test]
    fn test_keys() {
        assert_eq!(Value::from("male").as_key(), "male");
        assert_eq!(Value::Int(1).as_key(), "1");
        assert_eq!(Value::Bool(false).as_key(), "false");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Value::Date(date).as_key(), "2024-03-09");
    }

    #[test]
    fn test_message_args_macro() {
        let empty = message_args!();
        assert!(empty.is_empty());

        let args = message_args! {
            "name" => "Jeff",
            "count" => 3,
            "ratio" => 0.5,
            "flag" => Some(true),
            "nothing" => None::<i64>,
            "exact" => Value::decimal("1.0"),
        };
        assert_eq!(args["name"], Some(Value::Str("Jeff".to_string())));
        assert_eq!(args["count"], Some(Value::Int(3)));
        assert_eq!(args["ratio"], Some(Value::Float(0.5)));
        assert_eq!(args["flag"], Some(Value::Bool(true)));
        assert_eq!(args["nothing"], None);
        assert_eq!(args["exact"], Some(Value::Decimal("1.0".to_string())));
    }
}
