//! Integration tests for msgfmt-config crate.

use msgfmt_common::test_utils::property_testing::locale_tag_strategy;
use msgfmt_common::LocaleTag;
use msgfmt_config::{Config, ConfigError, ConfigFormat, ConfigLoader};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

const TOML_CONFIG: &str = r#"
[engine]
locale = "ru_RU"
cache_patterns = true
cache_capacity = 64

[plural_rules]
fallback_locale = "en"

[plural_rules.locales.xx]
one = "n = 1 @integer 1"
few = "n = 2..4"

[logging]
level = "msgfmt_core=debug"
"#;

const YAML_CONFIG: &str = r#"
engine:
  locale: "pl"
  cache_patterns: false
plural_rules:
  include_builtin: false
  locales:
    pl:
      one: "i = 1 and v = 0"
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_toml() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::new(write(&dir, "msgfmt.toml", TOML_CONFIG))
        .load_file()
        .unwrap();

    assert_eq!(config.engine.locale.as_str(), "ru-RU");
    assert_eq!(config.engine.cache_capacity, 64);
    assert!(config.plural_rules.include_builtin);
    assert_eq!(config.plural_rules.locales["xx"]["few"], "n = 2..4");
    assert_eq!(config.logging.level, "msgfmt_core=debug");
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_yaml_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::new(write(&dir, "msgfmt.yaml", YAML_CONFIG))
        .load_file()
        .unwrap();

    assert_eq!(config.engine.locale.as_str(), "pl");
    assert!(!config.engine.cache_patterns);
    assert_eq!(config.engine.cache_capacity, 1000);
    assert!(!config.plural_rules.include_builtin);
    assert_eq!(config.plural_rules.fallback_locale.as_str(), "en");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_load_json() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "msgfmt.json", r#"{"engine": {"locale": "de-de"}}"#);
    let config = ConfigLoader::new(path).load_file().unwrap();
    assert_eq!(config.engine.locale.as_str(), "de-DE");
}

#[test]
fn test_invalid_locale_in_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "msgfmt.json", r#"{"engine": {"locale": "???"}}"#);
    let result = ConfigLoader::new(path).load_file();
    assert!(matches!(result, Err(ConfigError::Json(_))));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::new(dir.path().join("absent.toml")).load_file();
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "msgfmt.ini", "locale = en");
    let err = ConfigLoader::new(path).load_file().unwrap_err();
    assert!(err.to_string().contains("Unsupported configuration format"));
}

#[test]
fn test_save_and_reload_each_format() {
    let dir = TempDir::new().unwrap();
    let original = ConfigFormat::Toml.parse(TOML_CONFIG).unwrap();

    for name in ["saved.toml", "saved.yaml", "saved.json"] {
        let loader = ConfigLoader::new(dir.path().join(name));
        loader.save(&original).unwrap();
        let reloaded = loader.load_file().unwrap();
        assert_eq!(reloaded, original, "round trip through {name}");
    }
}

#[test]
fn test_validation_runs_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "bad.toml",
        "[engine]\ncache_capacity = 0\n",
    );
    let result = ConfigLoader::new(path).load();
    assert!(matches!(result, Err(ConfigError::Validation { .. })));
}

#[test]
fn test_default_config_round_trips_through_toml() {
    let rendered = ConfigFormat::Toml.render(&Config::default()).unwrap();
    let parsed = ConfigFormat::Toml.parse(&rendered).unwrap();
    assert_eq!(parsed, Config::default());
}

proptest! {
    #[test]
    fn test_property_locales_survive_every_format(tag in locale_tag_strategy()) {
        let locale = LocaleTag::parse(&tag).unwrap();
        let mut config = Config::default();
        config.engine.locale = locale.clone();
        config.plural_rules.fallback_locale = locale.clone();
        config.plural_rules.locales.insert(
            tag.clone(),
            [("one".to_string(), "n = 1".to_string())].into_iter().collect(),
        );
        prop_assert!(config.validate().is_ok());

        for format in [ConfigFormat::Toml, ConfigFormat::Yaml, ConfigFormat::Json] {
            let parsed = format.parse(&format.render(&config).unwrap()).unwrap();
            prop_assert_eq!(&parsed.engine.locale, &locale);
            prop_assert_eq!(&parsed, &config);
        }
    }
}
