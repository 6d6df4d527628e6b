//! Structured logging infrastructure for the order packer service.
//!
//! This module provides:
//! - [`LoggingConfig`]: Configuration for the logging system
//! - [`init_logging`]: Initialize tracing with JSON or text formatting
//!
//! The configuration is normally filled in by [`crate::config::ServiceConfig`]
//! from `LOG_LEVEL` and `LOG_FORMAT`. `RUST_LOG`, when set, takes precedence
//! over the configured level.
//!
//! # Example
//!
//! ```no_run
//! use orderpacker_service_shared::logging::{LoggingConfig, init_logging};
//!
//! init_logging(&LoggingConfig::default());
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON structured logging (default, production).
    #[default]
    Json,
    /// Human-readable text logging (development).
    #[serde(alias = "pretty")]
    Text,
}

impl LogFormat {
    /// Parse a log format name.
    ///
    /// Accepts "json", "text", or "pretty" (alias for text), ignoring case.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" | "pretty" => Some(LogFormat::Text),
            _ => None,
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format (json or text).
    pub format: LogFormat,
    /// Log level filter (e.g., "info", "debug", "warn").
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Build the filter for this configuration, preferring `RUST_LOG`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Call once at application startup. Later calls are ignored.
///
/// # JSON Format (default)
///
/// ```json
/// {"timestamp":"2025-12-30T10:00:00Z","level":"INFO","target":"orderpacker_service","fields":{"message":"..."}}
/// ```
///
/// # Text Format (development)
///
/// ```text
/// 2025-12-30T10:00:00Z  INFO orderpacker_service: listening
/// ```
pub fn init_logging(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let result = match config.format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false);

            registry.with(json_layer).try_init()
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_name() {
        assert_eq!(LogFormat::from_name("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::from_name("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::from_name("text"), Some(LogFormat::Text));
        assert_eq!(LogFormat::from_name(" TEXT "), Some(LogFormat::Text));
        assert_eq!(LogFormat::from_name("pretty"), Some(LogFormat::Text));
        assert_eq!(LogFormat::from_name("unknown"), None);
    }

    #[test]
    fn test_log_format_serde() {
        assert_eq!(serde_json::to_string(&LogFormat::Text).unwrap(), "\"text\"");
        let pretty: LogFormat = serde_json::from_str("\"pretty\"").unwrap();
        assert_eq!(pretty, LogFormat::Text);
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        let config = LoggingConfig {
            format: LogFormat::Text,
            level: "warn".to_string(),
        };
        init_logging(&config);
        init_logging(&config);
    }
}
