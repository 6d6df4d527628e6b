//! Order packer CLI library.
//!
//! Output formatting for the `orderpacker-cli` binary. Kept in a library so
//! the renderers can be unit tested without spawning the process.

pub mod output;
