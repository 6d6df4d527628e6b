//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Request for packing an order.
///
/// A missing `items` field deserializes to zero and is rejected by
/// validation, the same as an explicit zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackRequest {
    /// Number of items to ship.
    #[serde(default)]
    pub items: u64,
}

impl PackRequest {
    pub fn new(items: u64) -> Self {
        Self { items }
    }

    /// Validate, additionally rejecting orders above `max_items`.
    pub fn validate_with_limit(
        &self,
        max_items: u64,
        request_id: &str,
    ) -> Result<(), Box<ProblemDetails>> {
        self.validate(request_id)?;

        if self.items > max_items {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("The 'items' field cannot exceed {}", max_items),
                request_id,
            )));
        }

        Ok(())
    }
}

impl Validate for PackRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.items == 0 {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'items' field is required and must be greater than zero",
                request_id,
            )));
        }

        Ok(())
    }
}
