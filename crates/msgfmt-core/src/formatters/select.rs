//! `{variable, select, key {text} ... other {text}}`

use super::{arguments_of, Formatter};
use crate::arguments::ParsedArguments;
use crate::engine::FormatEngine;
use crate::error::{MessageFormatError, MessageFormatResult};
use crate::plural::OTHER;
use crate::request::FormatRequest;
use crate::value::{MessageArgs, Value};
use tracing::trace;

/// Picks the block whose key equals the value, or `other`.
///
/// Strings compare as-is, numbers by their decimal text and booleans as
/// `true`/`false`. An unbound variable selects `other`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectFormatter;

impl Formatter for SelectFormatter {
    fn name(&self) -> &str {
        "select"
    }

    fn can_format(&self, request: &FormatRequest) -> bool {
        request.formatter_name.as_deref() == Some("select")
    }

    fn variable_must_exist(&self) -> bool {
        false
    }

    fn format(
        &self,
        _locale: &str,
        request: &FormatRequest,
        args: &MessageArgs,
        value: Option<&Value>,
        engine: &dyn FormatEngine,
    ) -> MessageFormatResult<String> {
        let parsed = ParsedArguments::parse(arguments_of(request))?;
        let key = value.map(Value::as_key);

        let block = key
            .as_deref()
            .and_then(|k| parsed.block(k))
            .or_else(|| parsed.block(OTHER))
            .ok_or_else(|| {
                MessageFormatError::formatter(format!(
                    "'{}' matched no select branch for '{}' and there is no 'other' branch",
                    request.variable_name,
                    key.as_deref().unwrap_or("null"),
                ))
            })?;

        trace!(variable = %request.variable_name, key = ?key, "Selected branch");
        engine.format_message(block, args)
    }
}
