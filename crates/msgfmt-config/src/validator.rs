//! Runtime validation of loaded configuration.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::Config;
use msgfmt_common::LocaleTag;
use tracing::debug;

/// Plural category labels CLDR defines.
pub const PLURAL_CATEGORIES: [&str; 6] = ["zero", "one", "two", "few", "many", "other"];

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    ///
    /// Rule texts are only checked for presence here; their grammar is
    /// checked when the engine compiles them.
    pub fn validate(config: &Config) -> ConfigResult<()> {
        if config.engine.cache_patterns && config.engine.cache_capacity == 0 {
            return Err(ConfigError::validation(
                "engine.cache_capacity",
                "must be greater than zero when caching is enabled",
            ));
        }

        if config.logging.level.trim().is_empty() {
            return Err(ConfigError::validation("logging.level", "cannot be empty"));
        }

        for (locale, rules) in &config.plural_rules.locales {
            let field = format!("plural_rules.locales.{locale}");
            LocaleTag::parse(locale).map_err(|e| ConfigError::validation(&field, e.to_string()))?;

            for (category, rule) in rules {
                if !PLURAL_CATEGORIES.contains(&category.as_str()) {
                    return Err(ConfigError::validation(
                        format!("{field}.{category}"),
                        format!(
                            "unknown plural category (expected one of {})",
                            PLURAL_CATEGORIES.join(", ")
                        ),
                    ));
                }
                if category != "other" && rule.split('@').next().unwrap_or("").trim().is_empty() {
                    return Err(ConfigError::validation(
                        format!("{field}.{category}"),
                        "rule text cannot be empty",
                    ));
                }
            }
        }

        debug!(
            custom_locales = config.plural_rules.locales.len(),
            "Configuration validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn with_rules(locale: &str, category: &str, rule: &str) -> Config {
        let mut config = Config::default();
        let mut rules = BTreeMap::new();
        rules.insert(category.to_string(), rule.to_string());
        config.plural_rules.locales.insert(locale.to_string(), rules);
        config
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_capacity_with_cache() {
        let mut config = Config::default();
        config.engine.cache_capacity = 0;
        assert!(ConfigValidator::validate(&config).is_err());

        config.engine.cache_patterns = false;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_category() {
        let config = with_rules("xx", "several", "n = 3");
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("plural_rules.locales.xx.several"));
    }

    #[test]
    fn test_empty_rule_text() {
        let config = with_rules("xx", "one", "  @integer 1");
        assert!(ConfigValidator::validate(&config).is_err());

        let config = with_rules("xx", "other", " @integer 0~15");
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_bad_locale_key() {
        let config = with_rules("not a locale", "one", "n = 1");
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
