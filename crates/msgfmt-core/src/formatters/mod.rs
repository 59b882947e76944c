//! Formatters and the ordered registry the engine dispatches through.

pub mod plural;
pub mod select;
pub mod value;
pub mod variable;

use crate::engine::FormatEngine;
use crate::error::MessageFormatResult;
use crate::plural::PluralRuleTable;
use crate::request::FormatRequest;
use crate::value::{MessageArgs, Value};
use std::fmt;
use std::sync::Arc;

pub use plural::PluralFormatter;
pub use select::SelectFormatter;
pub use value::{
    DateTimeStyle, LocaleValueRenderer, NumberStyle, ValueFormatter, ValueKind, ValueRenderer,
};
pub use variable::VariableFormatter;

/// Renders one kind of placeholder.
pub trait Formatter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether this formatter handles `request`.
    fn can_format(&self, request: &FormatRequest) -> bool;

    /// Whether an unbound variable is an error rather than `None`.
    fn variable_must_exist(&self) -> bool;

    /// Produces the replacement text for `request`.
    ///
    /// `value` is `None` when the variable is unbound or bound to null.
    /// Nested patterns are formatted through `engine`.
    fn format(
        &self,
        locale: &str,
        request: &FormatRequest,
        args: &MessageArgs,
        value: Option<&Value>,
        engine: &dyn FormatEngine,
    ) -> MessageFormatResult<String>;
}

/// Ordered list of formatters; the first that accepts a request wins.
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    formatters: Vec<Arc<dyn Formatter>>,
}

impl FormatterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in formatters: variable, select, plural,
    /// number, date and time.
    pub fn with_builtin(plural_rules: Arc<PluralRuleTable>, renderer: Arc<dyn ValueRenderer>) -> Self {
        let mut registry = Self::new();
        registry.push(Arc::new(VariableFormatter::new(Arc::clone(&renderer))));
        registry.push(Arc::new(SelectFormatter));
        registry.push(Arc::new(PluralFormatter::new(plural_rules)));
        for kind in [ValueKind::Number, ValueKind::Date, ValueKind::Time] {
            registry.push(Arc::new(ValueFormatter::new(kind, Arc::clone(&renderer))));
        }
        registry
    }

    /// Appends a formatter, consulted after all existing ones.
    pub fn push(&mut self, formatter: Arc<dyn Formatter>) {
        self.formatters.push(formatter);
    }

    /// Inserts a formatter at `index`, or at the end when `index` is past it.
    pub fn insert(&mut self, index: usize, formatter: Arc<dyn Formatter>) {
        let index = index.min(self.formatters.len());
        self.formatters.insert(index, formatter);
    }

    /// First formatter accepting `request`.
    pub fn resolve(&self, request: &FormatRequest) -> Option<&Arc<dyn Formatter>> {
        self.formatters.iter().find(|f| f.can_format(request))
    }

    /// Number of formatters.
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    /// Whether no formatter is registered.
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Formatter names in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.formatters.iter().map(|f| f.name()).collect()
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("formatters", &self.names())
            .finish()
    }
}

/// Arguments of a request, empty when the placeholder has none.
pub(crate) fn arguments_of(request: &FormatRequest) -> &str {
    request.formatter_args.as_deref().unwrap_or("")
}


#[cfg(test)]
mod tests {
    use super::test_support::request;
    use super::*;
    use crate::engine::MockFormatEngine;

    struct Shout;

    impl Formatter for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        fn can_format(&self, request: &FormatRequest) -> bool {
            request.formatter_name.is_none() || request.formatter_name.as_deref() == Some("shout")
        }

        fn variable_must_exist(&self) -> bool {
            false
        }

        fn format(
            &self,
            _locale: &str,
            request: &FormatRequest,
            _args: &MessageArgs,
            _value: Option<&Value>,
            _engine: &dyn FormatEngine,
        ) -> MessageFormatResult<String> {
            Ok(request.variable_name.to_uppercase())
        }
    }

    fn builtin() -> FormatterRegistry {
        FormatterRegistry::with_builtin(
            Arc::new(PluralRuleTable::default()),
            Arc::new(LocaleValueRenderer),
        )
    }

    #[test]
    fn test_builtin_order() {
        let registry = builtin();
        assert_eq!(
            registry.names(),
            vec!["variable", "select", "plural", "number", "date", "time"]
        );
    }

    #[test]
    fn test_resolve_by_name() {
        let registry = builtin();
        let plain = request("x", None, None);
        let select = request("x", Some("select"), Some("other {}"));
        let unknown = request("x", Some("choice"), None);

        assert_eq!(registry.resolve(&plain).unwrap().name(), "variable");
        assert_eq!(registry.resolve(&select).unwrap().name(), "select");
        assert!(registry.resolve(&unknown).is_none());
    }

    #[test]
    fn test_push_is_consulted_last() {
        let mut registry = builtin();
        registry.push(Arc::new(Shout));
        assert_eq!(
            registry.resolve(&request("x", None, None)).unwrap().name(),
            "variable"
        );
        assert_eq!(
            registry.resolve(&request("x", Some("shout"), None)).unwrap().name(),
            "shout"
        );
    }

    #[test]
    fn test_insert_takes_precedence() {
        let mut registry = builtin();
        registry.insert(0, Arc::new(Shout));
        let chosen = registry.resolve(&request("name", None, None)).unwrap();
        assert_eq!(chosen.name(), "shout");

        let engine = MockFormatEngine::new();
        let output = chosen
            .format("en", &request("name", None, None), &MessageArgs::new(), None, &engine)
            .unwrap();
        assert_eq!(output, "NAME");
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut registry = FormatterRegistry::new();
        assert!(registry.is_empty());
        registry.insert(10, Arc::new(Shout));
        assert_eq!(registry.len(), 1);
    }
}
