//! Component Engine - Slots, bindings, events, and the node tree.
//!
//! The engine manages the building blocks every component is made of:
//! - Slots: Declared, validated inputs (`SlotSchema` → `Slots`)
//! - Bindings: Parent-side expressions feeding a child's slots
//! - Emitter: Named events flowing to the parent
//! - ComponentNode: The node itself, its children, and its lifecycle
//!
//! # Architecture
//!
//! The tree is plain ownership: a parent owns its children outright.
//! Downward flow is a function call (`update(slot_values)`); upward flow is
//! a handler the parent registered on the child's emitter. No component
//! holds a reference into another component's state.

mod binding;
mod emitter;
mod node;
mod slots;

pub use binding::*;
pub use emitter::*;
pub use node::*;
pub use slots::*;
