//! Argument parsing and the format pipeline behind the `msgfmt` binary.

use crate::error::{CliError, CliResult};
use clap::Parser;
use msgfmt_common::{init_logging, LocaleTag};
use msgfmt_config::{apply_overrides, Config, ConfigLoader};
use msgfmt_core::value::is_decimal;
use msgfmt_core::{MessageArgs, MessageFormatter, Value};
use std::path::PathBuf;
use tracing::debug;

/// Format an ICU-style message pattern
#[derive(Parser, Debug, Clone)]
#[command(name = "msgfmt", version)]
#[command(about = "Format ICU-style message patterns", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, short, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Locale to format for, overriding the configuration
    #[arg(long, short, value_name = "TAG")]
    pub locale: Option<LocaleTag>,

    /// Parse the pattern without consulting the pattern cache
    #[arg(long)]
    pub no_cache: bool,

    /// Log filter, overriding the configuration
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// The message pattern
    pub pattern: String,

    /// Variable bindings as NAME=VALUE, or NAME alone for null
    #[arg(value_name = "NAME[=VALUE]")]
    pub bindings: Vec<String>,
}

/// Loads configuration from `--config` (or defaults), the environment and
/// the command line flags.
///
/// # Errors
///
/// Configuration loading or validation errors.
pub fn load_config(cli: &Cli) -> CliResult<Config> {
    load_config_with(cli, |key| std::env::var(key).ok())
}

/// [`load_config`] with an explicit environment lookup.
///
/// # Errors
///
/// Configuration loading or validation errors.
pub fn load_config_with<F>(cli: &Cli, lookup: F) -> CliResult<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::new(path).load_file()?,
        None => Config::default(),
    };
    apply_overrides(&mut config, lookup)?;

    if let Some(locale) = &cli.locale {
        config.engine.locale = locale.clone();
    }
    if cli.no_cache {
        config.engine.cache_patterns = false;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }

    config.validate()?;
    Ok(config)
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// [`CliError::Common`] when a subscriber is already installed or the log
/// file cannot be opened.
pub fn init_logging_for(cli: &Cli, config: &Config) -> CliResult<()> {
    init_logging(config.logging.to_logging_config())?;
    debug!(pattern = %cli.pattern, bindings = cli.bindings.len(), "Logging initialized");
    Ok(())
}

/// Formats the pattern with the bindings.
///
/// # Errors
///
/// Invalid bindings, plural rules that do not compile and formatting errors.
pub fn render(cli: &Cli, config: &Config) -> CliResult<String> {
    let args = parse_bindings(&cli.bindings)?;
    let formatter = MessageFormatter::from_config(config)?;
    Ok(formatter.format_message(&cli.pattern, &args)?)
}

/// Parses `NAME[=VALUE]` arguments into message arguments.
///
/// # Errors
///
/// [`CliError::InvalidBinding`] for an empty name.
pub fn parse_bindings(bindings: &[String]) -> CliResult<MessageArgs> {
    bindings
        .iter()
        .map(|binding| parse_binding(binding))
        .collect()
}

/// Parses one binding. Integers bind as [`Value::Int`], other decimals as
/// [`Value::Decimal`] and anything else as a string.
///
/// # Errors
///
/// [`CliError::InvalidBinding`] for an empty name.
pub fn parse_binding(binding: &str) -> CliResult<(String, Option<Value>)> {
    let (name, value) = match binding.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value)),
        None => (binding.trim(), None),
    };

    if name.is_empty() {
        return Err(CliError::InvalidBinding {
            binding: binding.to_string(),
            reason: "the variable name is empty".to_string(),
        });
    }

    let value = value.map(|text| {
        text.parse::<i64>().map_or_else(
            |_| {
                if is_decimal(text) {
                    Value::decimal(text)
                } else {
                    Value::from(text)
                }
            },
            Value::Int,
        )
    });

    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("msgfmt").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_binding_kinds() {
        assert_eq!(parse_binding("n=5").unwrap(), ("n".to_string(), Some(Value::Int(5))));
        assert_eq!(
            parse_binding("x=1.50").unwrap(),
            ("x".to_string(), Some(Value::decimal("1.50")))
        );
        assert_eq!(
            parse_binding("who=Jeff Smith").unwrap(),
            ("who".to_string(), Some(Value::from("Jeff Smith")))
        );
        assert_eq!(parse_binding("empty=").unwrap(), ("empty".to_string(), Some(Value::from(""))));
        assert_eq!(parse_binding("gone").unwrap(), ("gone".to_string(), None));
    }

    #[test]
    fn test_parse_binding_keeps_equals_in_value() {
        assert_eq!(
            parse_binding("eq=a=b").unwrap(),
            ("eq".to_string(), Some(Value::from("a=b")))
        );
    }

    #[test]
    fn test_parse_binding_rejects_empty_name() {
        assert!(matches!(
            parse_binding("=3"),
            Err(CliError::InvalidBinding { .. })
        ));
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = cli(&["--locale", "pt_BR", "--no-cache", "--log-level", "trace", "{x}"]);
        let config = load_config_with(&cli, |_| None).unwrap();
        assert_eq!(config.engine.locale.as_str(), "pt-BR");
        assert!(!config.engine.cache_patterns);
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_flags_win_over_environment() {
        let cli = cli(&["--locale", "de", "{x}"]);
        let config = load_config_with(&cli, |key| {
            (key == msgfmt_config::ENV_LOCALE).then(|| "fr".to_string())
        })
        .unwrap();
        assert_eq!(config.engine.locale.as_str(), "de");
    }

    #[test]
    fn test_invalid_locale_flag_is_rejected_by_clap() {
        let result = Cli::try_parse_from(["msgfmt", "--locale", "1", "{x}"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_render() {
        let cli = cli(&[
            "{n, plural, one {# file} other {# files}} for {who}",
            "n=1",
            "who=Ann",
        ]);
        let config = load_config_with(&cli, |_| None).unwrap();
        assert_eq!(render(&cli, &config).unwrap(), "1 file for Ann");
    }

    #[test]
    fn test_render_reports_missing_variable() {
        let cli = cli(&["{who}"]);
        let config = load_config_with(&cli, |_| None).unwrap();
        assert!(matches!(render(&cli, &config), Err(CliError::Format(_))));
    }
}
