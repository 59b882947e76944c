//! Configuration loading and persistence with atomic file operations.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::Config;
use msgfmt_common::LocaleTag;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding `engine.locale`.
pub const ENV_LOCALE: &str = "MSGFMT_LOCALE";
/// Environment variable overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "MSGFMT_LOG_LEVEL";
/// Environment variable overriding `engine.cache_patterns`.
pub const ENV_CACHE_PATTERNS: &str = "MSGFMT_CACHE_PATTERNS";

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.yaml` or `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    /// Parses configuration text in this format.
    pub fn parse(self, content: &str) -> ConfigResult<Config> {
        let config = match self {
            Self::Toml => toml::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Serializes a configuration in this format.
    pub fn render(self, config: &Config) -> ConfigResult<String> {
        match self {
            Self::Toml => toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
                message: e.to_string(),
            }),
            Self::Yaml => Ok(serde_yaml::to_string(config)?),
            Self::Json => Ok(serde_json::to_string_pretty(config)?),
        }
    }
}

/// Configuration loader with atomic file operations.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this loader reads from and writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads configuration from file, applies environment overrides and
    /// validates the result.
    pub fn load(&self) -> ConfigResult<Config> {
        let mut config = self.load_file()?;
        apply_overrides(&mut config, |key| std::env::var(key).ok())?;
        config.validate()?;
        info!(path = %self.path.display(), locale = %config.engine.locale, "Loaded configuration");
        Ok(config)
    }

    /// Loads configuration from file without overrides or validation.
    pub fn load_file(&self) -> ConfigResult<Config> {
        let format = ConfigFormat::from_path(&self.path)?;
        debug!(path = %self.path.display(), ?format, "Reading configuration file");

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::io(self.path.display().to_string(), e))?;
        format.parse(&content)
    }

    /// Saves configuration to file atomically.
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        let format = ConfigFormat::from_path(&self.path)?;
        let rendered = format.render(config)?;
        let display = self.path.display().to_string();

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(directory)
            .map_err(|e| ConfigError::io(display.clone(), e))?;
        temp.write_all(rendered.as_bytes())
            .map_err(|e| ConfigError::io(display.clone(), e))?;
        temp.persist(&self.path)
            .map_err(|e| ConfigError::io(display, e.error))?;

        debug!(path = %self.path.display(), "Saved configuration");
        Ok(())
    }
}

/// Applies overrides from a key lookup (normally the process environment).
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(locale) = lookup(ENV_LOCALE) {
        config.engine.locale = LocaleTag::parse(&locale)?;
        debug!(locale = %config.engine.locale, "Locale overridden from environment");
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }

    if let Some(flag) = lookup(ENV_CACHE_PATTERNS) {
        config.engine.cache_patterns = match flag.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(ConfigError::validation(
                    "engine.cache_patterns",
                    format!("'{other}' is not a boolean"),
                ))
            }
        };
    }

    Ok(())
}
