//! Shared infrastructure for the order packer HTTP service.
//!
//! This crate provides the functionality around the packing core:
//!
//! - [`ServiceConfig`]: Defaults, JSON or YAML config file and environment overrides
//! - [`AppState`]: The packer built once at startup and shared by handlers
//! - [`health`]: Health check handlers for Kubernetes liveness/readiness probes
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ServiceResponse`] and [`PackResponse`]: Successful response bodies
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request ID and metrics middleware
//! - [`PackRequest`] with validation
//!
//! # Architecture
//!
//! The service follows a thin-handler pattern where all packing logic resides
//! in `orderpacker-lib`. This crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate parameters                                      │
//! │  - Call Packer::try_pack_order                              │
//! │  - Aggregate boxes into PackResponse                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides ready-made state for handler testing.
//! Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

pub mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ConfigError, HttpConfig, PackConfig, ServiceConfig};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_boxes_per_order, record_items_requested,
    record_order_packed, record_order_rejected, MetricsConfig, MetricsError, RejectReason,
};
pub use middleware::{extract_or_generate_request_id, RequestId, TrackingLayer};
pub use problem::{
    ProblemDetails, ProblemKind, PROBLEM_CONTENT_TYPE, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_METHOD_NOT_ALLOWED,
};
pub use request::{PackRequest, Validate};
pub use response::{Pack, PackResponse, ServiceResponse};
pub use state::{AppState, AppStateError, ServiceInfo};
