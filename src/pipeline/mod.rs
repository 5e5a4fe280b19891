//! Storefront Pipeline
//!
//! Connects the component tree to whatever renders it.
//!
//! # Pipeline Architecture
//!
//! ```text
//! interaction → node handler → state write → root.propagate() → snapshot
//! ```
//!
//! ## Data Flow
//!
//! 1. **dispatch** - The rendering layer names a node by path and an interaction
//! 2. **propagate** - Slot bindings are re-evaluated top-down; unchanged slots are skipped
//! 3. **snapshot** - Computed values recompute lazily as the snapshot reads them

pub mod mount;

// Re-exports
pub use mount::{MountHandle, mount, mount_with_channel, unmount};
