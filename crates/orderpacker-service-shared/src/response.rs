//! Response types for successful HTTP responses.

use std::collections::BTreeMap;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Wrapper for successful responses with content type metadata.
///
/// This provides symmetry with `ProblemDetails` by including content type
/// information in the response body.
///
/// # Example
///
/// ```
/// use orderpacker_service_shared::{PackResponse, ServiceResponse};
///
/// let response = ServiceResponse::new(PackResponse::from_boxes(&[500, 250]));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    /// The actual response payload.
    #[serde(flatten)]
    pub data: T,

    /// Content type for this response.
    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    /// Create a new successful response with the default content type.
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Number of boxes of one capacity in a packed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    /// Box capacity.
    #[serde(rename = "box")]
    pub box_size: u64,
    /// How many boxes of this capacity are used.
    pub quantity: u64,
}

/// Aggregated packing result returned by `POST /api/v1/pack`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackResponse {
    /// One entry per distinct box capacity, largest capacity first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packs: Vec<Pack>,
}

impl PackResponse {
    /// Collapse a list of chosen boxes into per-capacity counts.
    pub fn from_boxes(boxes: &[u64]) -> Self {
        let mut counts: BTreeMap<u64, u64> = BTreeMap::new();
        for &box_size in boxes {
            *counts.entry(box_size).or_default() += 1;
        }

        let packs = counts
            .into_iter()
            .rev()
            .map(|(box_size, quantity)| Pack { box_size, quantity })
            .collect();

        Self { packs }
    }

    /// Total number of boxes across all entries.
    pub fn box_count(&self) -> u64 {
        self.packs.iter().map(|p| p.quantity).sum()
    }
}
