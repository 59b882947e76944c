//! Plain `{variable}` placeholders.

use super::{Formatter, ValueRenderer};
use crate::engine::FormatEngine;
use crate::error::MessageFormatResult;
use crate::request::FormatRequest;
use crate::value::{MessageArgs, Value};
use std::sync::Arc;

/// Renders a bound value as text. Null renders as the empty string.
pub struct VariableFormatter {
    renderer: Arc<dyn ValueRenderer>,
}

impl VariableFormatter {
    /// Creates the formatter.
    pub fn new(renderer: Arc<dyn ValueRenderer>) -> Self {
        Self { renderer }
    }
}

impl Formatter for VariableFormatter {
    fn name(&self) -> &str {
        "variable"
    }

    fn can_format(&self, request: &FormatRequest) -> bool {
        request.formatter_name.is_none()
    }

    fn variable_must_exist(&self) -> bool {
        true
    }

    fn format(
        &self,
        locale: &str,
        _request: &FormatRequest,
        _args: &MessageArgs,
        value: Option<&Value>,
        _engine: &dyn FormatEngine,
    ) -> MessageFormatResult<String> {
        value.map_or_else(|| Ok(String::new()), |v| self.renderer.render_value(locale, v))
    }
}
