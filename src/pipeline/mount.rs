//! Mount API - Storefront lifecycle and interaction entry point.
//!
//! Mounting builds the whole tree from a [`StoreConfig`], wires every
//! channel subscription the tree declared, and hands back a handle. The
//! rendering layer then talks to the tree only through the handle:
//! interactions go in by path, snapshots come out.
//!
//! # Example
//!
//! ```ignore
//! use spark_storefront::pipeline::mount;
//! use spark_storefront::config::StoreConfig;
//! use serde_json::json;
//!
//! let mut handle = mount::mount(&StoreConfig::default())?;
//!
//! handle.dispatch("product", "add-to-cart", &json!(null))?;
//! let snapshot = handle.snapshot();
//!
//! // Clean up
//! handle.unmount();
//! ```

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::components::app;
use crate::config::StoreConfig;
use crate::engine::{ComponentNode, Snapshot};
use crate::error::{ConstructionError, DispatchError, SlotError};
use crate::state::{DispatchFailure, EventChannel};

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by mount() that owns the tree.
///
/// Holds:
/// - The root node (and through it, every component)
/// - The channel shared by publishers and subscribers in the tree
///
/// Dropping the handle unmounts the tree.
pub struct MountHandle {
    root: ComponentNode,
    channel: EventChannel,
}

impl MountHandle {
    /// Run `interaction` on the node at `path`, then push any resulting
    /// state change down the whole tree.
    ///
    /// Paths are child keys joined with `/`, starting below the root:
    /// `""` is the app, `"product/product-tabs/review-form"` is the form.
    pub fn dispatch(
        &mut self,
        path: &str,
        interaction: &str,
        payload: &Value,
    ) -> Result<(), DispatchError> {
        let node = self
            .root
            .find(path)
            .ok_or_else(|| DispatchError::UnknownNode(path.to_string()))?;
        let result = node.dispatch(interaction, payload);

        // Propagate even on failure; a handler may have written before failing
        self.root.propagate()?;
        if let Err(err) = &result {
            debug!(path, interaction, %err, "interaction failed");
        }
        result
    }

    /// Push state written outside an interaction (a publish straight on
    /// the channel, an inventory update) down to every child slot.
    pub fn refresh(&mut self) -> Result<(), SlotError> {
        self.root.propagate()
    }

    /// Refresh, then read the whole tree.
    pub fn snapshot(&mut self) -> Snapshot {
        if let Err(err) = self.refresh() {
            warn!(%err, "snapshot taken with a rejected slot update");
        }
        self.root.snapshot()
    }

    pub fn root(&self) -> &ComponentNode {
        &self.root
    }

    pub fn find(&self, path: &str) -> Option<&ComponentNode> {
        self.root.find(path)
    }

    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }

    /// Handler failures recorded by the channel so far.
    pub fn failures(&self) -> Vec<DispatchFailure> {
        self.channel.failures()
    }

    pub fn is_mounted(&self) -> bool {
        self.root.is_mounted()
    }

    /// Release every channel subscription taken at mount.
    pub fn unmount(mut self) {
        self.root.unmount();
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.root.unmount();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount the storefront on a fresh channel.
pub fn mount(config: &StoreConfig) -> Result<MountHandle, ConstructionError> {
    mount_with_channel(config, EventChannel::new())
}

/// Mount on a channel the caller already holds, e.g. to observe
/// `review-submitted` from outside the tree.
pub fn mount_with_channel(
    config: &StoreConfig,
    channel: EventChannel,
) -> Result<MountHandle, ConstructionError> {
    let mut root = app(&channel, config)?;
    root.mount();
    info!(
        premium = config.premium,
        variants = config.product.variants.len(),
        "storefront mounted"
    );

    Ok(MountHandle { root, channel })
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

// =============================================================================
// Tests
// =============================================================================
