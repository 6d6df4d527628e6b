//! Application state for the HTTP service.
//!
//! This module provides the shared state structure that axum handlers use to
//! access the packer built at startup, its request limits and the identity
//! the service reports on its health endpoints.

use std::sync::Arc;

use orderpacker_lib::{Error as LibError, Packer, PackerConfig, DEFAULT_MAX_BOXES};

use crate::config::{ServiceConfig, DEFAULT_MAX_ITEMS};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// The configured box set was rejected by the packer.
    InvalidPacker(LibError),

    /// The per-request item limit was zero.
    InvalidMaxItems,

    /// An order at the item limit could need more boxes than allowed.
    BoxLimitExceeded { worst_case: u64, max_boxes: u64 },
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPacker(e) => write!(f, "failed to create packer: {}", e),
            Self::InvalidMaxItems => write!(f, "max items must be greater than zero"),
            Self::BoxLimitExceeded {
                worst_case,
                max_boxes,
            } => write!(
                f,
                "orders up to the item limit can need {} boxes, more than the limit of {}",
                worst_case, max_boxes
            ),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPacker(e) => Some(e),
            Self::InvalidMaxItems | Self::BoxLimitExceeded { .. } => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::InvalidPacker(err)
    }
}

/// Name and version reported by the health endpoints.
///
/// The service binary passes its own `CARGO_PKG_NAME` and
/// `CARGO_PKG_VERSION` so probes identify the deployed binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl ServiceInfo {
    pub const fn new(name: &'static str, version: &'static str) -> Self {
        Self { name, version }
    }
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self::new("orderpacker", "unknown")
    }
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor. The packer inside is never mutated,
/// so concurrent handlers read it without locking.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::post, extract::State};
/// use orderpacker_service_shared::{AppState, ServiceConfig};
///
/// async fn handler(State(state): State<AppState>) {
///     let boxes = state.packer().pack_order(501);
///     // ... use boxes
/// }
///
/// let state = AppState::from_config(&ServiceConfig::default()).unwrap();
/// let app = Router::new()
///     .route("/api/v1/pack", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Clone)]
struct AppStateInner {
    packer: Packer,
    max_items: u64,
    max_boxes: u64,
    service: ServiceInfo,
}

impl AppState {
    /// Build application state from the service configuration.
    ///
    /// # Returns
    ///
    /// Returns an `AppState` on success, or an `AppStateError` if the box set
    /// or the request limits are invalid.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, AppStateError> {
        let packer = Packer::new(PackerConfig::with_boxes(config.pack.boxes.iter().copied()))?;

        tracing::info!(
            boxes = ?packer.boxes().as_slice(),
            max_items = config.pack.max_items,
            max_boxes = config.pack.max_boxes,
            "packer created"
        );

        Self::with_limits(packer, config.pack.max_items, config.pack.max_boxes)
    }

    /// Create application state from a pre-built packer with the default
    /// box limit.
    ///
    /// This is useful for testing.
    pub fn from_packer(packer: Packer, max_items: u64) -> Result<Self, AppStateError> {
        Self::with_limits(packer, max_items, DEFAULT_MAX_BOXES)
    }

    /// Create application state with explicit request limits.
    ///
    /// Rejects limits under which an accepted order could expand into more
    /// than `max_boxes` boxes.
    pub fn with_limits(
        packer: Packer,
        max_items: u64,
        max_boxes: u64,
    ) -> Result<Self, AppStateError> {
        if max_items == 0 {
            return Err(AppStateError::InvalidMaxItems);
        }

        let worst_case = packer.max_box_count(max_items);
        if worst_case > max_boxes {
            return Err(AppStateError::BoxLimitExceeded {
                worst_case,
                max_boxes,
            });
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                packer,
                max_items,
                max_boxes,
                service: ServiceInfo::default(),
            }),
        })
    }

    /// Replace the name and version reported by the health endpoints.
    pub fn with_service(mut self, service: ServiceInfo) -> Self {
        Arc::make_mut(&mut self.inner).service = service;
        self
    }

    /// Access the shared packer.
    pub fn packer(&self) -> &Packer {
        &self.inner.packer
    }

    /// Largest `items` value accepted per request.
    pub fn max_items(&self) -> u64 {
        self.inner.max_items
    }

    /// Longest box list a single request may produce.
    pub fn max_boxes(&self) -> u64 {
        self.inner.max_boxes
    }

    pub fn service(&self) -> ServiceInfo {
        self.inner.service
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                packer: Packer::default(),
                max_items: DEFAULT_MAX_ITEMS,
                max_boxes: DEFAULT_MAX_BOXES,
                service: ServiceInfo::default(),
            }),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("boxes", &self.inner.packer.boxes().as_slice())
            .field("max_items", &self.inner.max_items)
            .field("max_boxes", &self.inner.max_boxes)
            .field("service", &self.inner.service)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderpacker_lib::DEFAULT_BOXES;

    #[test]
    fn test_app_state_from_default_config() {
        let state = AppState::from_config(&ServiceConfig::default()).unwrap();

        assert_eq!(state.packer().boxes().as_slice(), &DEFAULT_BOXES);
        assert_eq!(state.max_items(), DEFAULT_MAX_ITEMS);
    }

    #[test]
    fn test_app_state_from_custom_config() {
        let mut config = ServiceConfig::default();
        config.pack.boxes = vec![4, 1, 2, 2];
        config.pack.max_items = 10;

        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.packer().boxes().as_slice(), &[1, 2, 4]);
        assert_eq!(state.packer().pack_order(7), vec![4, 2, 1]);
        assert_eq!(state.max_items(), 10);
    }

    #[test]
    fn test_app_state_rejects_invalid_boxes() {
        let mut config = ServiceConfig::default();
        config.pack.boxes = vec![];

        let err = AppState::from_config(&config).unwrap_err();
        assert!(matches!(err, AppStateError::InvalidPacker(_)));
        assert!(err.to_string().contains("failed to create packer"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_app_state_rejects_zero_max_items() {
        let err = AppState::from_packer(Packer::default(), 0).unwrap_err();
        assert!(matches!(err, AppStateError::InvalidMaxItems));
    }

    #[test]
    fn test_app_state_rejects_unbounded_box_count() {
        let packer = Packer::with_boxes([1]).unwrap();
        let err = AppState::from_packer(packer, DEFAULT_MAX_ITEMS).unwrap_err();
        assert!(matches!(
            err,
            AppStateError::BoxLimitExceeded {
                worst_case: DEFAULT_MAX_ITEMS,
                max_boxes: DEFAULT_MAX_BOXES,
            }
        ));
        assert!(err.to_string().contains("100000000 boxes"));

        let packer = Packer::with_boxes([1]).unwrap();
        let state = AppState::with_limits(packer, 1_000, 1_000).unwrap();
        assert_eq!(state.max_boxes(), 1_000);
    }

    #[test]
    fn test_app_state_service_info() {
        let state = AppState::default();
        assert_eq!(state.service(), ServiceInfo::default());

        let shared = state.clone();
        let named = state.with_service(ServiceInfo::new("orderpacker-service", "1.2.3"));
        assert_eq!(named.service().name, "orderpacker-service");
        assert_eq!(named.service().version, "1.2.3");
        assert_eq!(shared.service().name, "orderpacker");
    }

    #[test]
    fn test_app_state_clone_shares_packer() {
        let state1 = AppState::default();
        let state2 = state1.clone();

        assert!(std::ptr::eq(state1.packer(), state2.packer()));
    }

    #[test]
    fn test_app_state_debug() {
        let debug = format!("{:?}", AppState::default());

        assert!(debug.contains("AppState"));
        assert!(debug.contains("boxes"));
        assert!(debug.contains("max_items"));
    }
}
