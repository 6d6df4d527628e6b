//! Order packer HTTP microservice.
//!
//! This service provides a REST API that works out which boxes to ship for a
//! requested number of items.
//!
//! # Endpoints
//!
//! - `GET /` - HTML order form posting to the pack endpoint
//! - `POST /api/v1/pack` - Pack an order: `{"items": 501}`
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! - `ORDERPACKER_CONFIG` - Optional JSON or YAML config file
//! - `HOST` / `PORT` - Bind address (default: 0.0.0.0:8080)
//! - `PACK_BOXES` - Comma-separated box sizes (default: 250,500,1000,2000,5000)
//! - `PACK_MAX_ITEMS` - Largest accepted order (default: 100000000)
//! - `PACK_MAX_BOXES` - Longest box list per order (default: 1000000)
//! - `LOG_LEVEL` / `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` / `METRICS_PATH` - Prometheus endpoint (default: on, /metrics)

use std::any::Any;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Serialize;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use orderpacker_service_shared::{
    AppState, LoggingConfig, MetricsConfig, PackRequest, PackResponse, ProblemDetails,
    RejectReason, RequestId, ServiceConfig, ServiceInfo, ServiceResponse, TrackingLayer,
    health_live, health_ready, init_logging, init_metrics, metrics_handler, record_boxes_per_order,
    record_items_requested, record_order_packed, record_order_rejected,
};

/// Identity reported by the health endpoints.
const SERVICE: ServiceInfo = ServiceInfo::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

const INDEX_HTML: &str = include_str!("index.html");

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(ServiceResponse<PackResponse>),
    Error(ProblemDetails),
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match ServiceConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingConfig::default());
            error!(error = %e, "failed to load configuration");
            return Err(e.into());
        }
    };

    init_logging(&config.log);

    info!(
        service = SERVICE.name,
        version = SERVICE.version,
        "starting order packer service"
    );

    if config.metrics.enabled {
        if let Err(e) = init_metrics(&config.metrics) {
            warn!(error = %e, "failed to initialize metrics, continuing without metrics");
        }
    }

    let state = AppState::from_config(&config)
        .map_err(|e| {
            error!(error = %e, "failed to create packer");
            e
        })?
        .with_service(SERVICE);

    let app = router(state, &config.metrics);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!(error = %e, addr = %addr, "failed to bind listener");
        e
    })?;
    info!(addr = %listener.local_addr()?, "listening on");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

/// Build the service router around `state`.
fn router(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut app = Router::new().route(
        "/api/v1/pack",
        post(pack_handler).fallback(method_not_allowed),
    );

    if metrics.enabled {
        app = app.route(&metrics.path, get(metrics_handler));
    }

    app.route("/", get(index))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .route("/favicon.ico", get(favicon))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(TrackingLayer)
        .with_state(state)
}

/// Handle POST /api/v1/pack requests.
async fn pack_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<PackRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(request_id = %request_id, error = %rejection, "rejected pack request body");
            record_order_rejected(RejectReason::InvalidBody);
            return Response::Error(ProblemDetails::bad_request(
                format!("Failed to parse request body: {}", rejection.body_text()),
                request_id.as_str(),
            ));
        }
    };

    info!(request_id = %request_id, items = request.items, "handling pack request");

    if let Err(problem) = request.validate_with_limit(state.max_items(), request_id.as_str()) {
        warn!(
            request_id = %request_id,
            items = request.items,
            "invalid pack request"
        );
        record_order_rejected(RejectReason::Validation);
        return Response::Error(*problem);
    }

    record_items_requested(request.items);

    let boxes = match state.packer().try_pack_order(request.items, state.max_boxes()) {
        Ok(boxes) => boxes,
        Err(e) => {
            warn!(
                request_id = %request_id,
                items = request.items,
                error = %e,
                "order too large to pack"
            );
            record_order_rejected(RejectReason::Validation);
            return Response::Error(ProblemDetails::bad_request(
                e.to_string(),
                request_id.as_str(),
            ));
        }
    };
    let response = PackResponse::from_boxes(&boxes);

    record_order_packed();
    record_boxes_per_order(response.box_count());

    info!(
        request_id = %request_id,
        items = request.items,
        boxes = boxes.len(),
        sizes = response.packs.len(),
        "order packed"
    );

    Response::Success(ServiceResponse::new(response))
}

async fn method_not_allowed(method: Method, request_id: RequestId) -> ProblemDetails {
    ProblemDetails::method_not_allowed(method.as_str(), request_id.as_str())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Turn a handler panic into a 500 problem response.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };

    error!(panic = %detail, "panic recovered");

    ProblemDetails::internal_error("The server encountered an unexpected error").into_response()
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("received shutdown signal, shutting down gracefully");
}
