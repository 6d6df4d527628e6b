//! Prometheus metrics for the order packer service.
//!
//! [`init_metrics`] installs a global Prometheus recorder once at startup and
//! [`metrics_handler`] renders it. Handlers record business events through
//! the `record_*` helpers; HTTP request metrics come from
//! [`TrackingLayer`](crate::middleware::TrackingLayer).
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use orderpacker_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default()).expect("recorder installs once");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use axum::{http::header::CONTENT_TYPE, response::IntoResponse};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prometheus text exposition format.
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// The `metrics` section of [`ServiceConfig`](crate::ServiceConfig).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route serving the exposition text. Must start with `/`.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics are disabled")]
    Disabled,
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    #[error("failed to install metrics recorder: {0}")]
    Install(#[from] BuildError),
}

/// Install the global Prometheus recorder.
///
/// # Errors
///
/// Fails when metrics are disabled, when a recorder is already installed,
/// or when the exporter cannot be built.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// Render the recorder in Prometheus text format.
///
/// Serves a single comment line until [`init_metrics`] has run.
pub async fn metrics_handler() -> impl IntoResponse {
    let body = match PROMETHEUS_HANDLE.get() {
        Some(handle) => handle.render(),
        None => "# metrics recorder not installed\n".to_string(),
    };
    ([(CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], body)
}

/// Why a pack request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The body was not a JSON object with a numeric `items`.
    InvalidBody,
    /// `items` was zero or above the configured limit.
    Validation,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidBody => "invalid_body",
            Self::Validation => "validation_error",
        }
    }
}

/// Count a successfully packed order.
pub fn record_order_packed() {
    metrics::counter!("orderpacker_orders_packed_total").increment(1);
}

/// Count a rejected pack request, labelled by reason.
pub fn record_order_rejected(reason: RejectReason) {
    metrics::counter!("orderpacker_orders_rejected_total", "reason" => reason.as_str())
        .increment(1);
}

pub fn record_boxes_per_order(count: u64) {
    metrics::histogram!("orderpacker_boxes_per_order").record(count as f64);
}

pub fn record_items_requested(items: u64) {
    metrics::histogram!("orderpacker_items_requested").record(items as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_metrics_config_partial_json() {
        let config: MetricsConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_init_metrics_disabled() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        assert!(matches!(init_metrics(&config), Err(MetricsError::Disabled)));
    }

    #[tokio::test]
    async fn test_metrics_handler_sets_exposition_content_type() {
        let response = metrics_handler().await.into_response();
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            EXPOSITION_CONTENT_TYPE
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains('#') || body.is_empty());
    }

    #[test]
    fn test_reject_reason_labels() {
        assert_eq!(RejectReason::InvalidBody.as_str(), "invalid_body");
        assert_eq!(RejectReason::Validation.as_str(), "validation_error");
    }

    #[test]
    fn test_business_metrics_record_without_recorder() {
        record_order_packed();
        record_order_rejected(RejectReason::Validation);
        record_boxes_per_order(4);
        record_items_requested(12001);
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert_eq!(
            MetricsError::AlreadyInitialized.to_string(),
            "metrics recorder already initialized"
        );
    }
}
