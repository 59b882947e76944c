//! The formatting engine: request dispatch, splicing and the pattern cache.

use crate::error::{MessageFormatError, MessageFormatResult};
use crate::formatters::{Formatter, FormatterRegistry, LocaleValueRenderer, ValueRenderer};
use crate::pattern_parser::parse_requests;
use crate::plural::{category_rank, global_rules, PluralRuleTable};
use crate::request::{FormatRequest, RequestSequence};
use crate::scanner::unescape;
use crate::value::MessageArgs;
use moka::sync::Cache;
use msgfmt_common::LocaleTag;
use msgfmt_config::defaults::DEFAULT_CACHE_CAPACITY;
use msgfmt_config::Config;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

/// Formats patterns. Formatters receive this to format nested branches.
#[cfg_attr(test, mockall::automock)]
pub trait FormatEngine: Send + Sync {
    /// Formats `pattern` with `args`.
    ///
    /// # Errors
    ///
    /// Any scanning, parsing or formatting error; nothing is returned
    /// partially.
    fn format_message(&self, pattern: &str, args: &MessageArgs) -> MessageFormatResult<String>;
}

/// Pattern cache counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: AtomicU64,
    /// Lookups that had to parse
    pub misses: AtomicU64,
}

impl CacheStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Share of lookups answered from the cache.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let total = hits + self.misses.load(Ordering::Relaxed) as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }

    /// Counters by name.
    pub fn get_stats(&self) -> HashMap<String, u64> {
        let mut stats = HashMap::new();
        stats.insert("hits".to_string(), self.hits.load(Ordering::Relaxed));
        stats.insert("misses".to_string(), self.misses.load(Ordering::Relaxed));
        stats
    }
}

/// Locale-bound message formatter.
///
/// Parsed patterns are cached by their exact text when caching is on. Each
/// call works on its own copy of the cached requests, so a formatter can be
/// shared across threads.
///
/// ```
/// use msgfmt_core::{message_args, MessageFormatter};
///
/// let formatter = MessageFormatter::new();
/// let args = message_args! { "name" => "Jeff", "messages" => 123 };
/// let text = formatter
///     .format_message("{name} has {messages, plural, other {# messages}}.", &args)
///     .unwrap();
/// assert_eq!(text, "Jeff has 123 messages.");
/// ```
pub struct MessageFormatter {
    locale: LocaleTag,
    cache: Option<Cache<String, Arc<RequestSequence>>>,
    stats: CacheStats,
    registry: FormatterRegistry,
    plural_rules: Arc<PluralRuleTable>,
}

impl MessageFormatter {
    /// English formatter with caching, the process-wide plural rules and
    /// the built-in formatters.
    pub fn new() -> Self {
        MessageFormatterBuilder::new().build()
    }

    /// Starts a builder.
    pub fn builder() -> MessageFormatterBuilder {
        MessageFormatterBuilder::new()
    }

    /// Builds a formatter from configuration.
    ///
    /// The plural rule table starts from the built-in rules when
    /// `plural_rules.include_builtin` is set, and configured locales are
    /// compiled on top. Configured categories are tried in CLDR order
    /// (zero, one, two, few, many, then any other label).
    ///
    /// # Errors
    ///
    /// [`MessageFormatError::InvalidPluralRule`] or
    /// [`MessageFormatError::InvalidCharacter`] for configured rules that do
    /// not compile or are keyed by an invalid locale.
    pub fn from_config(config: &Config) -> MessageFormatResult<Self> {
        let rules = &config.plural_rules;
        let fallback = rules.fallback_locale.clone();
        let table = if rules.include_builtin {
            PluralRuleTable::with_builtin(fallback)
        } else {
            PluralRuleTable::new(fallback)
        };

        for (locale, categories) in &rules.locales {
            let tag = LocaleTag::parse(locale).map_err(|e| {
                MessageFormatError::invalid_rule(format!("plural_rules.locales.{locale}"), e.to_string())
            })?;
            let mut ordered: Vec<(&str, &str)> = categories
                .iter()
                .map(|(category, rule)| (category.as_str(), rule.as_str()))
                .collect();
            ordered.sort_by_key(|(category, _)| category_rank(category));
            table.insert_rules(&tag, ordered)?;
        }

        info!(
            locale = %config.engine.locale,
            cache = config.engine.cache_patterns,
            plural_locales = table.len(),
            "Message formatter configured"
        );

        Ok(MessageFormatterBuilder::new()
            .locale(config.engine.locale.clone())
            .cache_patterns(config.engine.cache_patterns)
            .cache_capacity(config.engine.cache_capacity)
            .plural_rules(Arc::new(table))
            .build())
    }

    /// Locale messages are formatted for.
    pub const fn locale(&self) -> &LocaleTag {
        &self.locale
    }

    /// Plural rules used by the plural formatter.
    pub const fn plural_rules(&self) -> &Arc<PluralRuleTable> {
        &self.plural_rules
    }

    /// Registered formatters.
    pub const fn registry(&self) -> &FormatterRegistry {
        &self.registry
    }

    /// Registered formatters, for adding custom ones.
    pub fn registry_mut(&mut self) -> &mut FormatterRegistry {
        &mut self.registry
    }

    /// Whether parsed patterns are cached.
    pub const fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Drops every cached pattern.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
            cache.run_pending_tasks();
            debug!("Pattern cache cleared");
        }
    }

    /// Number of cached patterns.
    pub fn cached_pattern_count(&self) -> u64 {
        self.cache.as_ref().map_or(0, |cache| {
            cache.run_pending_tasks();
            cache.entry_count()
        })
    }

    /// Pattern cache counters.
    pub const fn cache_stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Formats `pattern` with `args`.
    ///
    /// Placeholders are formatted left to right. Each result replaces its
    /// placeholder in the working text and the placeholders after it are
    /// moved by the change in length. Quoting is resolved once at the end.
    ///
    /// # Errors
    ///
    /// Scanner and parser errors, [`MessageFormatError::FormatterNotFound`],
    /// [`MessageFormatError::VariableNotFound`] and any formatter error.
    #[instrument(level = "trace", skip(self, args), fields(locale = %self.locale))]
    pub fn format_message(&self, pattern: &str, args: &MessageArgs) -> MessageFormatResult<String> {
        let mut requests = self.requests_for(pattern)?;
        let mut buffer = pattern.to_string();

        for index in 0..requests.len() {
            let Some(request) = requests.get(index) else {
                break;
            };
            let (start, end) = (request.span.start, request.span.end);
            let result = self.format_request(request, args)?;

            buffer.replace_range(start..=end, &result);
            requests.shift_indices(index, result.len());
        }

        Ok(unescape(&buffer))
    }

    fn format_request(&self, request: &FormatRequest, args: &MessageArgs) -> MessageFormatResult<String> {
        let formatter = self.resolve(request)?;

        let value = match args.get(&request.variable_name) {
            Some(value) => value.as_ref(),
            None if formatter.variable_must_exist() => {
                return Err(MessageFormatError::variable_not_found(&request.variable_name));
            }
            None => None,
        };

        trace!(
            variable = %request.variable_name,
            formatter = formatter.name(),
            line = request.span.line,
            column = request.span.column,
            "Formatting placeholder"
        );
        formatter.format(self.locale.as_str(), request, args, value, self)
    }

    fn resolve(&self, request: &FormatRequest) -> MessageFormatResult<&Arc<dyn Formatter>> {
        self.registry
            .resolve(request)
            .ok_or_else(|| MessageFormatError::FormatterNotFound {
                formatter_name: request.formatter_name_or_empty().to_string(),
                line: request.span.line,
                column: request.span.column,
            })
    }

    /// A private copy of the requests of `pattern`, from the cache if possible.
    fn requests_for(&self, pattern: &str) -> MessageFormatResult<RequestSequence> {
        let Some(cache) = &self.cache else {
            return parse_requests(pattern);
        };

        if let Some(cached) = cache.get(pattern) {
            self.stats.record_hit();
            debug!(requests = cached.len(), "Pattern cache hit");
            return Ok(RequestSequence::clone(&cached));
        }

        self.stats.record_miss();
        let parsed = parse_requests(pattern)?;
        debug!(requests = parsed.len(), "Pattern cache miss");
        cache.insert(pattern.to_string(), Arc::new(parsed.clone()));
        Ok(parsed)
    }
}

impl FormatEngine for MessageFormatter {
    fn format_message(&self, pattern: &str, args: &MessageArgs) -> MessageFormatResult<String> {
        Self::format_message(self, pattern, args)
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageFormatter")
            .field("locale", &self.locale)
            .field("caching", &self.is_caching())
            .field("registry", &self.registry)
            .field("plural_rules", &self.plural_rules)
            .finish_non_exhaustive()
    }
}

/// Builder for [`MessageFormatter`].
pub struct MessageFormatterBuilder {
    locale: LocaleTag,
    cache_patterns: bool,
    cache_capacity: u64,
    plural_rules: Option<Arc<PluralRuleTable>>,
    renderer: Option<Arc<dyn ValueRenderer>>,
    formatters: Vec<Arc<dyn Formatter>>,
}

impl MessageFormatterBuilder {
    /// Builder with the defaults of [`MessageFormatter::new`].
    pub fn new() -> Self {
        Self {
            locale: LocaleTag::default(),
            cache_patterns: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            plural_rules: None,
            renderer: None,
            formatters: Vec::new(),
        }
    }

    /// Sets the locale.
    #[must_use]
    pub fn locale(mut self, locale: LocaleTag) -> Self {
        self.locale = locale;
        self
    }

    /// Turns the pattern cache on or off.
    #[must_use]
    pub const fn cache_patterns(mut self, enabled: bool) -> Self {
        self.cache_patterns = enabled;
        self
    }

    /// Sets how many parsed patterns the cache keeps.
    #[must_use]
    pub const fn cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Uses `table` instead of the process-wide plural rules.
    #[must_use]
    pub fn plural_rules(mut self, table: Arc<PluralRuleTable>) -> Self {
        self.plural_rules = Some(table);
        self
    }

    /// Uses `renderer` for variables, numbers, dates and times.
    #[must_use]
    pub fn value_renderer(mut self, renderer: Arc<dyn ValueRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Registers an extra formatter after the built-in ones.
    #[must_use]
    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatters.push(formatter);
        self
    }

    /// Builds the formatter.
    pub fn build(self) -> MessageFormatter {
        let plural_rules = self.plural_rules.unwrap_or_else(global_rules);
        let renderer = self
            .renderer
            .unwrap_or_else(|| Arc::new(LocaleValueRenderer));

        let mut registry = FormatterRegistry::with_builtin(Arc::clone(&plural_rules), renderer);
        for formatter in self.formatters {
            registry.push(formatter);
        }

        let cache = self
            .cache_patterns
            .then(|| Cache::builder().max_capacity(self.cache_capacity).build());

        MessageFormatter {
            locale: self.locale,
            cache,
            stats: CacheStats::default(),
            registry,
            plural_rules,
        }
    }
}

impl Default for MessageFormatterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_FORMATTER: Lazy<MessageFormatter> = Lazy::new(MessageFormatter::new);

/// The process-wide English formatter behind [`format_message`].
pub fn default_formatter() -> &'static MessageFormatter {
    &DEFAULT_FORMATTER
}

/// Formats `pattern` with the process-wide default formatter.
///
/// # Errors
///
/// See [`MessageFormatter::format_message`].
pub fn format_message(pattern: &str, args: &MessageArgs) -> MessageFormatResult<String> {
    DEFAULT_FORMATTER.format_message(pattern, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_args;
    use msgfmt_common::test_utils::{init_test_logging, pattern_fixtures};

    fn formatter(locale: &str) -> MessageFormatter {
        MessageFormatter::builder()
            .locale(LocaleTag::parse(locale).unwrap())
            .build()
    }

    #[test]
    fn test_name_and_plural() {
        init_test_logging();
        let args = message_args! { "name" => "Jeff", "messages" => 123 };
        let output = formatter("en")
            .format_message(pattern_fixtures::NAME_AND_PLURAL, &args)
            .unwrap();
        assert_eq!(output, "Jeff has 123 messages.");
    }

    #[test]
    fn test_text_without_placeholders() {
        let output = formatter("en")
            .format_message("Nothing to see, it''s plain", &MessageArgs::new())
            .unwrap();
        assert_eq!(output, "Nothing to see, it's plain");
    }

    #[test]
    fn test_variable_not_found() {
        let err = formatter("en")
            .format_message("Hi {name}", &MessageArgs::new())
            .unwrap_err();
        assert_eq!(err, MessageFormatError::variable_not_found("name"));
    }

    #[test]
    fn test_formatter_not_found() {
        let args = message_args! { "n" => 1 };
        let err = formatter("en")
            .format_message("a\n  {n, choice, 0#none}", &args)
            .unwrap_err();
        assert_eq!(
            err,
            MessageFormatError::FormatterNotFound {
                formatter_name: "choice".to_string(),
                line: 2,
                column: 3,
            }
        );
    }

    #[test]
    fn test_nested_results_shift_following_placeholders() {
        let args = message_args! { "a" => "x", "b" => "a much longer value", "c" => "!" };
        let output = formatter("en")
            .format_message("{a}{b, select, other {<{b}>}}{c}", &args)
            .unwrap();
        assert_eq!(output, "x<a much longer value>!");
    }

    #[test]
    fn test_multibyte_results() {
        let args = message_args! { "who" => "Jörg", "what" => "ünïcödé" };
        let output = formatter("de")
            .format_message("→ {who} sagt {what} ←", &args)
            .unwrap();
        assert_eq!(output, "→ Jörg sagt ünïcödé ←");
    }

    #[test]
    fn test_cache_records_hits() {
        let engine = formatter("en");
        let pattern = "{x}";
        engine.format_message(pattern, &message_args! { "x" => 1 }).unwrap();
        engine.format_message(pattern, &message_args! { "x" => 2 }).unwrap();

        assert_eq!(engine.cached_pattern_count(), 1);
        assert_eq!(engine.cache_stats().hits.load(Ordering::Relaxed), 1);
        assert_eq!(engine.cache_stats().misses.load(Ordering::Relaxed), 1);
        assert!((engine.cache_stats().hit_rate() - 0.5).abs() < f64::EPSILON);

        engine.clear_cache();
        assert_eq!(engine.cached_pattern_count(), 0);
    }

    #[test]
    fn test_failed_parse_is_not_cached() {
        let engine = formatter("en");
        assert!(engine.format_message("{", &MessageArgs::new()).is_err());
        assert_eq!(engine.cached_pattern_count(), 0);
    }

    #[test]
    fn test_cache_disabled() {
        let engine = MessageFormatter::builder().cache_patterns(false).build();
        engine.format_message("{x}", &message_args! { "x" => 1 }).unwrap();
        assert!(!engine.is_caching());
        assert_eq!(engine.cached_pattern_count(), 0);
    }

    #[test]
    fn test_from_config_compiles_rules() {
        let mut config = Config::default();
        config.engine.locale = LocaleTag::parse("xx").unwrap();
        config.plural_rules.include_builtin = false;
        config.plural_rules.locales.insert(
            "xx".to_string(),
            [("one".to_string(), "n = 0..1".to_string())].into_iter().collect(),
        );

        let engine = MessageFormatter::from_config(&config).unwrap();
        assert_eq!(engine.plural_rules().len(), 1);

        let output = engine
            .format_message("{n, plural, one {single} other {plural}}", &message_args! { "n" => 0 })
            .unwrap();
        assert_eq!(output, "single");
    }

    #[test]
    fn test_from_config_orders_categories() {
        let mut config = Config::default();
        config.engine.locale = LocaleTag::parse("xx").unwrap();
        config.plural_rules.locales.insert(
            "xx".to_string(),
            [
                ("few".to_string(), "n = 0..5".to_string()),
                ("one".to_string(), "n = 1".to_string()),
            ]
            .into_iter()
            .collect(),
        );

        let engine = MessageFormatter::from_config(&config).unwrap();
        let render = |n: i64| {
            engine
                .format_message("{n, plural, one {a} few {b} other {c}}", &message_args! { "n" => n })
                .unwrap()
        };
        assert_eq!(render(1), "a");
        assert_eq!(render(3), "b");
        assert_eq!(render(9), "c");
    }

    #[test]
    fn test_from_config_rejects_bad_rule() {
        let mut config = Config::default();
        config.plural_rules.locales.insert(
            "xx".to_string(),
            [("one".to_string(), "n ~ 1".to_string())].into_iter().collect(),
        );
        let err = MessageFormatter::from_config(&config).unwrap_err();
        assert!(matches!(err, MessageFormatError::InvalidCharacter { character: '~', .. }));
    }

    #[test]
    fn test_global_format_message() {
        let output = format_message("{g, select, other {ok}}", &MessageArgs::new()).unwrap();
        assert_eq!(output, "ok");
        assert_eq!(default_formatter().locale().as_str(), "en");
    }

    #[test]
    fn test_mock_engine_is_usable_as_trait_object() {
        let mut mock = MockFormatEngine::new();
        mock.expect_format_message()
            .returning(|pattern, _| Ok(pattern.to_uppercase()));
        let engine: &dyn FormatEngine = &mock;
        assert_eq!(engine.format_message("abc", &MessageArgs::new()).unwrap(), "ABC");
    }
}
