//! Metadata resolver facade.
//!
//! Re-exports the workspace crates under one name so host applications can
//! depend on `metadata-resolver` alone. The `desktop-shims` feature pulls in
//! the reqwest-backed HTTP client.

pub use bridge_traits as bridge;
pub use core_metadata as metadata;
pub use core_runtime as runtime;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop as desktop;
