//! Default values for every configuration section.

use crate::schema::*;
use msgfmt_common::LocaleTag;
use std::collections::BTreeMap;

/// Default number of parsed patterns kept in the cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 1000;

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            plural_rules: PluralRulesConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locale: LocaleTag::default(),
            cache_patterns: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Default for PluralRulesConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            fallback_locale: LocaleTag::default(),
            locales: BTreeMap::new(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}
