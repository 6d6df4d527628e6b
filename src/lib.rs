//! Workspace root package.
//!
//! Carries workspace-level tooling such as the `rusty-hook` pre-commit
//! configuration. The code lives in the member crates under `crates/`.
