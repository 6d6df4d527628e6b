//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Every error the pack endpoint returns is one of a small set of
//! [`ProblemKind`]s, each with a fixed type URI, title and status code.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Media type of every problem response.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem type URI for unsupported HTTP methods.
pub const PROBLEM_METHOD_NOT_ALLOWED: &str = "/problems/method-not-allowed";

/// The categories of problem the service reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    InvalidRequest,
    MethodNotAllowed,
    Internal,
}

impl ProblemKind {
    pub fn type_uri(self) -> &'static str {
        match self {
            Self::InvalidRequest => PROBLEM_INVALID_REQUEST,
            Self::MethodNotAllowed => PROBLEM_METHOD_NOT_ALLOWED,
            Self::Internal => PROBLEM_INTERNAL_ERROR,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::Internal => "Internal Error",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// RFC 9457 problem body.
///
/// ```
/// use orderpacker_service_shared::{ProblemDetails, ProblemKind};
///
/// let problem = ProblemDetails::from_kind(ProblemKind::InvalidRequest)
///     .with_detail("The 'items' field is required and must be greater than zero")
///     .with_request_id("req-12345");
/// assert_eq!(problem.status, 400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{title}: {}", .detail.as_deref().unwrap_or_default())]
pub struct ProblemDetails {
    /// Relative URI identifying the problem type.
    #[serde(rename = "type")]
    pub type_uri: String,

    pub title: String,

    pub status: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// The request ID of the failing request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    pub content_type: String,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: PROBLEM_CONTENT_TYPE.to_string(),
        }
    }

    pub fn from_kind(kind: ProblemKind) -> Self {
        Self::new(kind.type_uri(), kind.title(), kind.status())
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 for a body that failed to parse or validate.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::from_kind(ProblemKind::InvalidRequest)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// 405 for a method the route does not serve.
    pub fn method_not_allowed(method: &str, request_id: impl Into<String>) -> Self {
        Self::from_kind(ProblemKind::MethodNotAllowed)
            .with_detail(format!("Method {method} is not allowed on this endpoint"))
            .with_request_id(request_id)
    }

    /// 500 with a detail that is safe to show to callers.
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::from_kind(ProblemKind::Internal).with_detail(detail)
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(CONTENT_TYPE, PROBLEM_CONTENT_TYPE)],
            Json(self),
        )
            .into_response()
    }
}
