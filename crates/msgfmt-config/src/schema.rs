//! Configuration schema definitions using serde.

use crate::error::ConfigResult;
use crate::validator::ConfigValidator;
use msgfmt_common::{LocaleTag, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category label to CLDR rule text, e.g. `one` → `i = 1 and v = 0`.
pub type PluralRuleSet = BTreeMap<String, String>;

/// Main configuration structure for msgfmt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Formatting engine configuration.
    pub engine: EngineConfig,
    /// Plural rule table configuration.
    pub plural_rules: PluralRulesConfig,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

/// Formatting engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Locale messages are formatted for.
    pub locale: LocaleTag,
    /// Whether parsed patterns are cached.
    pub cache_patterns: bool,
    /// Maximum number of cached patterns.
    pub cache_capacity: u64,
}

/// Plural rule table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluralRulesConfig {
    /// Whether the built-in CLDR cardinal rules are loaded.
    pub include_builtin: bool,
    /// Locale whose rules apply when neither the tag nor its language match.
    pub fallback_locale: LocaleTag,
    /// Additional or overriding rules, keyed by locale tag.
    pub locales: BTreeMap<String, PluralRuleSet>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level filter directive.
    pub level: String,
    /// Whether to emit JSON records.
    pub json: bool,
    /// Optional log file.
    pub file: Option<String>,
}

impl LoggingSettings {
    /// Converts to the logging setup understood by `msgfmt-common`.
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            json_format: self.json,
            file_path: self.file.clone(),
            ..LoggingConfig::default()
        }
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate(self)
    }
}
