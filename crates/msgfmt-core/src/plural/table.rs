//! Compiled pluralizers and the locale table that holds them.

use super::ast::Condition;
use super::cldr::CARDINAL_RULES;
use super::context::PluralContext;
use super::parser::parse_rule;
use crate::error::MessageFormatResult;
use dashmap::{DashMap, DashSet};
use msgfmt_common::LocaleTag;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Category returned when nothing else matches.
pub const OTHER: &str = "other";

/// CLDR category order.
pub const CATEGORY_ORDER: [&str; 5] = ["zero", "one", "two", "few", "many"];

/// Position of `label` in [`CATEGORY_ORDER`], unknown labels last.
pub fn category_rank(label: &str) -> usize {
    CATEGORY_ORDER
        .iter()
        .position(|known| *known == label)
        .unwrap_or(CATEGORY_ORDER.len())
}

/// Closure deciding a category.
pub type PluralFn = dyn Fn(&PluralContext) -> String + Send + Sync;

/// Chooses the plural category of a number for one locale.
#[derive(Clone)]
pub enum Pluralizer {
    /// Parsed CLDR conditions; first match wins, `other` otherwise.
    Rules(Vec<Condition>),
    /// Consumer supplied closure.
    Custom(Arc<PluralFn>),
}

impl Pluralizer {
    /// Compiles `(category, rule text)` pairs.
    ///
    /// Conditions are tried in the order given, so overlapping rules resolve
    /// to whichever came first. A rule for `other` is ignored since `other`
    /// is the fallback.
    ///
    /// # Errors
    ///
    /// The first grammar error among the rule texts.
    pub fn from_rules<I, K, V>(rules: I) -> MessageFormatResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut conditions = Vec::new();
        for (label, text) in rules {
            let count_label = label.into();
            if count_label == OTHER {
                continue;
            }
            conditions.push(Condition {
                or_conditions: parse_rule(text.as_ref())?,
                count_label,
            });
        }
        Ok(Self::Rules(conditions))
    }

    /// Wraps a closure.
    pub fn custom<F>(function: F) -> Self
    where
        F: Fn(&PluralContext) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(function))
    }

    /// Category of `ctx`.
    pub fn category(&self, ctx: &PluralContext) -> String {
        match self {
            Self::Rules(conditions) => conditions
                .iter()
                .find(|condition| condition.matches(ctx))
                .map_or_else(|| OTHER.to_string(), |c| c.count_label.clone()),
            Self::Custom(function) => function(ctx),
        }
    }
}

impl fmt::Debug for Pluralizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules(conditions) => f.debug_tuple("Rules").field(conditions).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Built-in pluralizers, compiled once per process.
static BUILTIN: Lazy<HashMap<&'static str, Arc<Pluralizer>>> = Lazy::new(|| {
    let mut compiled = HashMap::new();
    for (locales, rules) in CARDINAL_RULES {
        match Pluralizer::from_rules(rules.iter().copied()) {
            Ok(pluralizer) => {
                let shared = Arc::new(pluralizer);
                for locale in *locales {
                    compiled.insert(*locale, Arc::clone(&shared));
                }
            }
            Err(e) => error!(?locales, error = %e, "Built-in plural rules failed to compile"),
        }
    }
    debug!(locales = compiled.len(), "Compiled built-in plural rules");
    compiled
});

/// Process-wide table used by engines that are not given their own.
static GLOBAL: Lazy<Arc<PluralRuleTable>> =
    Lazy::new(|| Arc::new(PluralRuleTable::with_builtin(LocaleTag::default())));

/// The process-wide plural rule table, holding the built-in rules.
///
/// Registrations here are seen by every engine built without an explicit
/// table, including the default one behind [`crate::format_message`].
pub fn global_rules() -> Arc<PluralRuleTable> {
    Arc::clone(&GLOBAL)
}

/// Locale to pluralizer table.
///
/// Keys are lowercase locale tags. Lookups try the full tag, then each
/// shorter prefix, then the fallback locale.
pub struct PluralRuleTable {
    pluralizers: DashMap<String, Arc<Pluralizer>>,
    fallback: LocaleTag,
    warned: DashSet<String>,
}

impl PluralRuleTable {
    /// Creates an empty table.
    pub fn new(fallback: LocaleTag) -> Self {
        Self {
            pluralizers: DashMap::new(),
            fallback,
            warned: DashSet::new(),
        }
    }

    /// Creates a table holding the built-in CLDR rules.
    pub fn with_builtin(fallback: LocaleTag) -> Self {
        let table = Self::new(fallback);
        for (locale, pluralizer) in BUILTIN.iter() {
            table
                .pluralizers
                .insert((*locale).to_string(), Arc::clone(pluralizer));
        }
        table
    }

    /// Locale consulted when a lookup finds nothing.
    pub const fn fallback(&self) -> &LocaleTag {
        &self.fallback
    }

    /// Adds or replaces the pluralizer of `locale`.
    pub fn insert(&self, locale: &LocaleTag, pluralizer: Pluralizer) {
        debug!(locale = %locale, "Registered pluralizer");
        self.pluralizers
            .insert(locale.lookup_key(), Arc::new(pluralizer));
    }

    /// Compiles rule texts and registers them for `locale`.
    ///
    /// # Errors
    ///
    /// Grammar errors from the rule texts; the table is left unchanged.
    pub fn insert_rules<I, K, V>(&self, locale: &LocaleTag, rules: I) -> MessageFormatResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let pluralizer = Pluralizer::from_rules(rules)?;
        self.insert(locale, pluralizer);
        Ok(())
    }

    /// Registers a closure for `locale`.
    pub fn insert_custom<F>(&self, locale: &LocaleTag, function: F)
    where
        F: Fn(&PluralContext) -> String + Send + Sync + 'static,
    {
        self.insert(locale, Pluralizer::custom(function));
    }

    /// Whether `locale` has its own entry, without fallback.
    pub fn contains(&self, locale: &LocaleTag) -> bool {
        self.pluralizers.contains_key(&locale.lookup_key())
    }

    /// Number of registered locales.
    pub fn len(&self) -> usize {
        self.pluralizers.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.pluralizers.is_empty()
    }

    /// Pluralizer for `locale`, falling back to its language and then to
    /// the fallback locale.
    pub fn resolve(&self, locale: &str) -> Option<Arc<Pluralizer>> {
        let chain = LocaleTag::parse(locale).map_or_else(
            |_| vec![locale.trim().to_ascii_lowercase()],
            |tag| tag.fallback_chain(),
        );
        if let Some(found) = self.lookup(&chain) {
            return Some(found);
        }

        let found = self.lookup(&self.fallback.fallback_chain());
        let key = chain.first().map_or(locale, String::as_str);
        if self.warned.insert(key.to_string()) {
            warn!(
                locale,
                fallback = %self.fallback,
                found = found.is_some(),
                "No plural rules for locale, using fallback"
            );
        } else {
            debug!(locale, fallback = %self.fallback, "Using fallback plural rules");
        }
        found
    }

    /// Category of `ctx` under `locale`'s rules, `other` when no rules apply.
    pub fn category(&self, locale: &str, ctx: &PluralContext) -> String {
        self.resolve(locale)
            .map_or_else(|| OTHER.to_string(), |pluralizer| pluralizer.category(ctx))
    }

    fn lookup(&self, chain: &[String]) -> Option<Arc<Pluralizer>> {
        chain
            .iter()
            .find_map(|key| self.pluralizers.get(key).map(|entry| Arc::clone(entry.value())))
    }
}

impl Default for PluralRuleTable {
    fn default() -> Self {
        Self::with_builtin(LocaleTag::default())
    }
}

impl fmt::Debug for PluralRuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluralRuleTable")
            .field("locales", &self.pluralizers.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}
