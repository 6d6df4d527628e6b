//! Health check handlers for Kubernetes probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses for Kubernetes liveness and readiness probes.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator.
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Box capacities the packer was built with (for readiness check).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxes: Option<Vec<u64>>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            boxes: None,
        }
    }

    /// Create a ready status listing the configured boxes.
    pub fn ready(service: &str, version: &str, boxes: &[u64]) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            boxes: Some(boxes.to_vec()),
        }
    }
}

/// Liveness probe handler.
///
/// Returns 200 OK if the service is running.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"orderpacker-service","version":"0.1.0"}
/// ```
pub async fn health_live(State(state): State<AppState>) -> impl IntoResponse {
    let service = state.service();
    let status = HealthStatus::alive(service.name, service.version);
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// The packer is validated before the listener starts, so a running service
/// is always ready. The response reports the box set in use.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"orderpacker-service","version":"0.1.0","boxes":[250,500,1000,2000,5000]}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let service = state.service();
    let status = HealthStatus::ready(
        service.name,
        service.version,
        state.packer().boxes().as_slice(),
    );
    (StatusCode::OK, Json(status))
}
