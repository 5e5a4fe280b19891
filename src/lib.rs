//! # spark-storefront
//!
//! Reactive storefront core for Rust.
//!
//! One product page as a tree of stateful components: a catalog of
//! variants, a cart, and a tabbed review system where a nested form
//! publishes reviews that land in a list owned by a distant component.
//!
//! ## Architecture
//!
//! Every piece of mutable state is a versioned [`Field`](reactive::Field).
//! Derived values are lazy [`Computed`](reactive::Computed)s that recompute
//! only when a field in their declared read set has a newer version.
//!
//! Data moves three ways:
//! ```text
//! parent ──slots──▶ child          (bindings evaluated on propagate)
//! child  ──emit───▶ parent         (named events, parent-registered handlers)
//! node   ──publish─▶ EventChannel ──▶ subscribers (taken at mount)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core records (Variant, Review, Rating) and event names
//! - [`reactive`] - Versioned fields and memoized computed values
//! - [`state`] - Event channel, catalog, review store, cart, tabs
//! - [`engine`] - Slots, bindings, emitters, and the component node
//! - [`components`] - The concrete storefront tree
//! - [`pipeline`] - Mount, dispatch by path, snapshot, unmount
//! - [`config`] - The product seed and premium flag

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod reactive;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{ProductSeed, StoreConfig};

pub use error::{
    CatalogError, ConfigError, ConstructionError, DispatchError, SelectionError, SlotError,
};

pub use engine::{Binding, ComponentNode, SlotKind, SlotSchema, SlotSpec, SlotValues, Snapshot};

pub use pipeline::{MountHandle, mount, mount_with_channel, unmount};

pub use reactive::{Computed, Field};

pub use state::{Cart, DispatchFailure, EventChannel, ReviewStore, TabSelection, VariantCatalog};
