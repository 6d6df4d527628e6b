//! Order packer library entry points.
//!
//! This crate holds the box-selection core: a validated [`BoxSet`] of
//! capacities and the greedy [`Packer`] that turns an item quantity into a
//! list of boxes. Higher-level consumers (the HTTP service, the CLI) should
//! only depend on the items exported here instead of reimplementing the
//! packing rules.

#![deny(warnings)]

pub mod error;
pub mod packer;

pub use error::{Error, InvalidBoxSetReason, Result};
pub use packer::{BoxSet, Packer, PackerConfig, DEFAULT_BOXES, DEFAULT_MAX_BOXES};
