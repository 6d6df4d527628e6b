//! Test utilities for handler testing.
//!
//! This module provides ready-made application state with well-known box sets.

use orderpacker_lib::Packer;

use crate::state::AppState;

/// Box sets with known packing results, for use in tests.
pub mod fixture_boxes {
    /// Powers of two; 7 items pack as `[4, 2, 1]`.
    pub const POWERS: [u64; 3] = [1, 2, 4];

    /// A single capacity; 7 items pack as `[3, 3, 3]`.
    pub const SINGLE: [u64; 1] = [3];
}

/// State backed by the default box set and default item limit.
pub fn test_state() -> AppState {
    AppState::default()
}

/// Packer over `boxes`.
///
/// # Panics
///
/// Panics if `boxes` is not a valid box set.
pub fn packer_with_boxes(boxes: &[u64]) -> Packer {
    Packer::with_boxes(boxes.iter().copied())
        .unwrap_or_else(|e| panic!("invalid test box set {:?}: {}", boxes, e))
}

/// State backed by `boxes` with the given item limit and the default box
/// limit.
///
/// # Panics
///
/// Panics if `boxes` is not a valid box set or the limits are rejected. This
/// indicates a test configuration issue.
pub fn state_with_boxes(boxes: &[u64], max_items: u64) -> AppState {
    AppState::from_packer(packer_with_boxes(boxes), max_items)
        .unwrap_or_else(|e| panic!("invalid test state: {}", e))
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", crate::RequestId::generate())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_uses_default_boxes() {
        let state = test_state();
        assert_eq!(state.packer().pack_order(501), vec![500, 250]);
    }

    #[test]
    fn test_state_with_fixture_boxes() {
        let powers = state_with_boxes(&fixture_boxes::POWERS, 100);
        assert_eq!(powers.packer().pack_order(7), vec![4, 2, 1]);
        assert_eq!(powers.max_items(), 100);

        let single = state_with_boxes(&fixture_boxes::SINGLE, 100);
        assert_eq!(single.packer().pack_order(7), vec![3, 3, 3]);
    }

    #[test]
    fn test_request_id_unique() {
        assert_ne!(test_request_id(), test_request_id());
    }
}
