//! Service configuration.
//!
//! Configuration is resolved in three layers:
//!
//! 1. Built-in defaults ([`ServiceConfig::default`]).
//! 2. An optional file named by `ORDERPACKER_CONFIG`, YAML when the
//!    extension is `.yaml` or `.yml` and JSON otherwise. Sections or fields
//!    missing from the file keep their defaults.
//! 3. Environment overrides.
//!
//! # Environment Variables
//!
//! - `HOST`: bind address (default: `0.0.0.0`)
//! - `PORT`: bind port (default: `8080`)
//! - `PACK_BOXES`: comma-separated box capacities (default: `250,500,1000,2000,5000`)
//! - `PACK_MAX_ITEMS`: largest accepted `items` value per request (default: `100000000`)
//! - `PACK_MAX_BOXES`: longest packing result per request (default: `1000000`)
//! - `LOG_LEVEL`: log level filter (default: `info`)
//! - `LOG_FORMAT`: `json` (default), `text` or `pretty`
//! - `METRICS_ENABLED`: `true` (default) or `false`
//! - `METRICS_PATH`: route of the Prometheus endpoint (default: `/metrics`)
//!
//! Empty variables are treated as unset. Every invalid value is reported,
//! not just the first one.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use orderpacker_lib::{BoxSet, Packer, DEFAULT_BOXES, DEFAULT_MAX_BOXES};

use crate::logging::{LogFormat, LoggingConfig};
use crate::metrics::MetricsConfig;

/// Names the optional JSON or YAML configuration file.
pub const CONFIG_FILE_ENV: &str = "ORDERPACKER_CONFIG";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const BOXES_ENV: &str = "PACK_BOXES";
pub const MAX_ITEMS_ENV: &str = "PACK_MAX_ITEMS";
pub const MAX_BOXES_ENV: &str = "PACK_MAX_BOXES";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const METRICS_ENABLED_ENV: &str = "METRICS_ENABLED";
pub const METRICS_PATH_ENV: &str = "METRICS_PATH";

/// Default upper bound on `items` for a single request.
pub const DEFAULT_MAX_ITEMS: u64 = 100_000_000;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidEnv {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file was not valid JSON for [`ServiceConfig`].
    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file was not valid YAML for [`ServiceConfig`].
    #[error("failed to parse config file {path}: {source}")]
    ParseYamlFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The resolved box list is not a valid box set.
    #[error("invalid pack configuration: {0}")]
    InvalidBoxes(#[from] orderpacker_lib::Error),

    /// A resolved setting failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidSetting {
        field: &'static str,
        reason: String,
    },

    /// Several problems were found at once.
    #[error("{}", format_errors(.0))]
    Multiple(Vec<ConfigError>),
}

fn format_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigError {
    fn from_list(mut errors: Vec<ConfigError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ConfigError::Multiple(errors)),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Packing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Box capacities, normalized when the packer is built.
    pub boxes: Vec<u64>,
    /// Largest `items` value accepted by the pack endpoint.
    pub max_items: u64,
    /// Longest box list a single request may produce.
    pub max_boxes: u64,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            boxes: DEFAULT_BOXES.to_vec(),
            max_items: DEFAULT_MAX_ITEMS,
            max_boxes: DEFAULT_MAX_BOXES,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub http: HttpConfig,
    pub pack: PackConfig,
    pub log: LoggingConfig,
    pub metrics: MetricsConfig,
}

impl ServiceConfig {
    /// Load configuration from the process environment.
    ///
    /// Reads the file named by `ORDERPACKER_CONFIG` first, when set, then
    /// applies environment overrides and validates the result.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };

        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Resolve defaults plus overrides from `lookup`.
    ///
    /// `lookup` stands in for the process environment, which keeps tests
    /// free of global state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    /// Read a configuration file. The result is not yet validated.
    ///
    /// `.yaml` and `.yml` files are parsed as YAML, anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        if is_yaml(path) {
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::ParseYamlFile {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_json::from_str(&contents).map_err(|source| ConfigError::ParseFile {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Apply overrides from `lookup` on top of `self`, then validate.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();
        let get = |key: &'static str| {
            let value = lookup(key).filter(|v| !v.trim().is_empty());
            if value.is_none() {
                tracing::debug!(env = key, "env not set, using default");
            }
            value
        };

        if let Some(host) = get(HOST_ENV) {
            self.http.host = host.trim().to_string();
        }

        if let Some(port) = get(PORT_ENV) {
            match port.trim().parse::<u16>() {
                Ok(port) => self.http.port = port,
                Err(e) => errors.push(invalid_env(PORT_ENV, &port, e)),
            }
        }

        if let Some(boxes) = get(BOXES_ENV) {
            match parse_boxes(&boxes) {
                Ok(boxes) => self.pack.boxes = boxes,
                Err(e) => errors.push(invalid_env(BOXES_ENV, &boxes, e)),
            }
        }

        if let Some(max_items) = get(MAX_ITEMS_ENV) {
            match max_items.trim().parse::<u64>() {
                Ok(max_items) => self.pack.max_items = max_items,
                Err(e) => errors.push(invalid_env(MAX_ITEMS_ENV, &max_items, e)),
            }
        }

        if let Some(max_boxes) = get(MAX_BOXES_ENV) {
            match max_boxes.trim().parse::<u64>() {
                Ok(max_boxes) => self.pack.max_boxes = max_boxes,
                Err(e) => errors.push(invalid_env(MAX_BOXES_ENV, &max_boxes, e)),
            }
        }

        if let Some(level) = get(LOG_LEVEL_ENV) {
            self.log.level = level.trim().to_string();
        }

        if let Some(format) = get(LOG_FORMAT_ENV) {
            match LogFormat::from_name(&format) {
                Some(format) => self.log.format = format,
                None => errors.push(invalid_env(
                    LOG_FORMAT_ENV,
                    &format,
                    "expected json, text or pretty",
                )),
            }
        }

        if let Some(enabled) = get(METRICS_ENABLED_ENV) {
            match parse_flag(&enabled) {
                Some(enabled) => self.metrics.enabled = enabled,
                None => errors.push(invalid_env(
                    METRICS_ENABLED_ENV,
                    &enabled,
                    "expected true or false",
                )),
            }
        }

        if let Some(path) = get(METRICS_PATH_ENV) {
            self.metrics.path = path.trim().to_string();
        }

        if let Some(err) = ConfigError::from_list(errors) {
            return Err(err);
        }

        self.validate()?;
        Ok(self)
    }

    /// Check settings that cannot be expressed by their types alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        match BoxSet::new(self.pack.boxes.iter().copied()) {
            Ok(boxes) => {
                let worst_case = Packer::from_box_set(boxes).max_box_count(self.pack.max_items);
                if worst_case > self.pack.max_boxes {
                    errors.push(ConfigError::InvalidSetting {
                        field: "pack.max_items",
                        reason: format!(
                            "an order of {} items can need {} boxes, above pack.max_boxes ({})",
                            self.pack.max_items, worst_case, self.pack.max_boxes
                        ),
                    });
                }
            }
            Err(e) => errors.push(ConfigError::InvalidBoxes(e)),
        }

        if self.pack.max_items == 0 {
            errors.push(ConfigError::InvalidSetting {
                field: "pack.max_items",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.pack.max_boxes == 0 {
            errors.push(ConfigError::InvalidSetting {
                field: "pack.max_boxes",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.http.host.trim().is_empty() {
            errors.push(ConfigError::InvalidSetting {
                field: "http.host",
                reason: "must not be empty".to_string(),
            });
        }

        if !self.metrics.path.starts_with('/') {
            errors.push(ConfigError::InvalidSetting {
                field: "metrics.path",
                reason: "must start with '/'".to_string(),
            });
        }

        if let Err(e) = EnvFilter::try_new(&self.log.level) {
            errors.push(ConfigError::InvalidSetting {
                field: "log.level",
                reason: e.to_string(),
            });
        }

        match ConfigError::from_list(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Address to bind the HTTP listener to, bracketing IPv6 literals.
    pub fn bind_address(&self) -> String {
        match self.http.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("[{}]:{}", ip, self.http.port),
            _ => format!("{}:{}", self.http.host, self.http.port),
        }
    }
}

fn invalid_env(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a comma-separated list of capacities such as `"250, 500,1000"`.
pub fn parse_boxes(value: &str) -> Result<Vec<u64>, std::num::ParseIntError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse::<u64>)
        .collect()
}
