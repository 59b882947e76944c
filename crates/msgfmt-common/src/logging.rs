//! Structured logging infrastructure for msgfmt

use crate::error::{CommonError, CommonResult};
use std::path::Path;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "msgfmt_core=trace")
    pub level: String,
    /// Whether to emit JSON records
    pub json_format: bool,
    /// Whether to enable pretty formatting with colors
    pub pretty_format: bool,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include span open/close events in the output
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: false,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Logging configuration with the given level filter and defaults otherwise
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Initialize the tracing subscriber with the given configuration
///
/// Fails if a global subscriber is already installed or the log file cannot
/// be opened.
pub fn init_logging(config: LoggingConfig) -> CommonResult<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());
    let span_events = config.span_events();

    let result = match (&config.file_path, config.json_format) {
        (Some(file_path), json) => {
            let path = Path::new(file_path);
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| CommonError::logging(format!("'{file_path}' is not a file path")))?;
            let appender = tracing_appender::rolling::never(directory, file_name);

            if json {
                registry
                    .with(
                        fmt::layer()
                            .json()
                            .with_span_events(span_events)
                            .with_target(config.include_targets)
                            .with_writer(appender),
                    )
                    .try_init()
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_ansi(false)
                            .with_span_events(span_events)
                            .with_target(config.include_targets)
                            .with_writer(appender),
                    )
                    .try_init()
            }
        }
        (None, true) => registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(span_events)
                    .with_target(config.include_targets)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (None, false) if config.pretty_format => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_span_events(span_events)
                    .with_target(config.include_targets)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (None, false) => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_span_events(span_events)
                    .with_target(config.include_targets)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| CommonError::logging(e.to_string()))
}

/// Initialize logging with default configuration
pub fn init_default_logging() -> CommonResult<()> {
    init_logging(LoggingConfig::default())
}

/// Initialize logging for development (pretty, debug level, spans)
pub fn init_dev_logging() -> CommonResult<()> {
    init_logging(LoggingConfig {
        level: "debug".to_string(),
        pretty_format: true,
        include_spans: true,
        ..LoggingConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert!(!config.pretty_format);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_with_level() {
        let config = LoggingConfig::with_level("msgfmt_core=trace");
        assert_eq!(config.level, "msgfmt_core=trace");
        assert!(!config.json_format);
    }

    #[test]
    fn test_span_events_toggle() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.span_events(), FmtSpan::NONE);
        config.include_spans = true;
        assert_eq!(config.span_events(), FmtSpan::NEW | FmtSpan::CLOSE);
    }
}
