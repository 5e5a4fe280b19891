//! Component Node - One stateful unit of the view tree.
//!
//! A node bundles:
//! - validated slots (inbound, written only by the parent)
//! - exposed local state (read accessors over the node's own fields)
//! - a [`ComputedTable`] of derived values
//! - an [`Emitter`] for events flowing up to the parent
//! - named interactions the rendering layer calls back into
//! - owned children, each with slot bindings evaluated against this node
//!
//! # Data Flow
//!
//! ```text
//!            ┌──────────── parent ────────────┐
//!  update(slots) ↓                      ↑ emit(event)
//!            ┌──────────── node ──────────────┐
//!  propagate → bindings → child.update(slots) │
//!            └────────────────────────────────┘
//!  channel ⇄ subscriptions declared for the node's mounted lifetime
//! ```
//!
//! Parents never reach into a child's state and children never write a
//! parent's; the only paths are slot updates down and events up.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::binding::Binding;
use super::emitter::Emitter;
use super::slots::{SlotSchema, SlotValues, Slots};
use crate::error::{ConstructionError, DispatchError, SlotError};
use crate::reactive::{Computed, ComputedTable, Dependency, Field};
use crate::state::{ChannelHandler, EventChannel, SubscriptionHandle};

/// Callback for one interaction name (click, hover, submit, input, ...).
pub type Interaction = Rc<dyn Fn(&Value) -> Result<(), DispatchError>>;

// =============================================================================
// Snapshot
// =============================================================================

/// Read-only view of a node handed to the rendering layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub key: String,
    pub component: String,
    pub slots: BTreeMap<String, Value>,
    pub state: BTreeMap<String, Value>,
    pub computed: BTreeMap<String, Value>,
    pub children: Vec<Snapshot>,
}

impl Snapshot {
    /// Descend by child keys separated with `/`.
    pub fn find(&self, path: &str) -> Option<&Snapshot> {
        split_path(path).try_fold(self, |node, key| node.children.iter().find(|c| c.key == key))
    }
}

// =============================================================================
// Children and Subscriptions
// =============================================================================

struct ChildNode {
    key: &'static str,
    node: ComponentNode,
    bindings: Vec<(&'static str, Binding)>,
}

impl ChildNode {
    fn slot_values(&self) -> SlotValues {
        evaluate(&self.bindings)
    }
}

struct DeclaredSubscription {
    channel: EventChannel,
    topic: &'static str,
    handler: ChannelHandler,
}

// =============================================================================
// Component Node
// =============================================================================

pub struct ComponentNode {
    schema: SlotSchema,
    slots: Slots,
    state: BTreeMap<&'static str, Binding>,
    computed: ComputedTable,
    emitter: Emitter,
    interactions: HashMap<&'static str, Interaction>,
    children: Vec<ChildNode>,
    declared: Vec<DeclaredSubscription>,
    active: Vec<(EventChannel, SubscriptionHandle)>,
    mounted: bool,
    revision: u64,
}

impl fmt::Debug for ComponentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentNode")
            .field("name", &self.name())
            .field("slots", &self.schema.specs().len())
            .field("computed", &self.computed.len())
            .field("children", &self.children.iter().map(|c| c.key).collect::<Vec<_>>())
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl ComponentNode {
    /// Validate `supplied` against `schema`. A missing required slot is fatal.
    pub fn new(schema: SlotSchema, supplied: SlotValues) -> Result<Self, ConstructionError> {
        let component = schema.component();
        let slots = schema
            .instantiate(supplied)
            .map_err(|source| ConstructionError::new(component, source))?;

        Ok(Self {
            emitter: Emitter::new(component),
            schema,
            slots,
            state: BTreeMap::new(),
            computed: ComputedTable::new(),
            interactions: HashMap::new(),
            children: Vec::new(),
            declared: Vec::new(),
            active: Vec::new(),
            mounted: false,
            revision: 0,
        })
    }

    pub fn name(&self) -> &'static str {
        self.schema.component()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of slot updates that actually changed something.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // =========================================================================
    // Slots
    // =========================================================================

    pub fn slot(&self, name: &str) -> Option<Value> {
        self.slots.get(name)
    }

    /// Handle to a declared slot, for use inside derivations.
    pub fn slot_field(&self, name: &'static str) -> Result<Field<Value>, ConstructionError> {
        self.slots.field(name).ok_or_else(|| {
            ConstructionError::new(self.name(), SlotError::Unknown { slot: name.to_string() })
        })
    }

    // =========================================================================
    // Local State and Computed Values
    // =========================================================================

    /// Make a piece of local state visible in snapshots.
    pub fn expose(&mut self, name: &'static str, reader: impl Into<Binding>) {
        self.state.insert(name, reader.into());
    }

    pub fn state(&self, name: &str) -> Option<Value> {
        self.state.get(name).map(Binding::get)
    }

    pub fn define(
        &mut self,
        name: &'static str,
        read_set: impl IntoIterator<Item = Dependency>,
        derive: impl Fn() -> Value + 'static,
    ) -> Computed<Value> {
        self.computed.define(name, read_set, derive)
    }

    pub fn computed(&self, name: &str) -> Option<Value> {
        self.computed.get(name)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Clone of this node's emitter, for capture inside interactions.
    pub fn emitter(&self) -> Emitter {
        self.emitter.clone()
    }

    /// Parent side: handle `event` when this node emits it.
    pub fn on(&self, event: &str, handler: impl Fn(&Value) + 'static) {
        self.emitter.on(event, handler);
    }

    pub fn emit(&self, event: &str, payload: Value) -> bool {
        self.emitter.emit(event, payload)
    }

    pub fn on_interaction(
        &mut self,
        name: &'static str,
        handler: impl Fn(&Value) -> Result<(), DispatchError> + 'static,
    ) {
        self.interactions.insert(name, Rc::new(handler));
    }

    pub fn interactions(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.interactions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Entry point for the rendering layer.
    pub fn dispatch(&self, interaction: &str, payload: &Value) -> Result<(), DispatchError> {
        let handler = self.interactions.get(interaction).cloned().ok_or_else(|| {
            DispatchError::UnknownInteraction {
                component: self.name(),
                interaction: interaction.to_string(),
            }
        })?;
        debug!(component = self.name(), interaction, "dispatch");
        handler(payload)
    }

    /// Subscribe to `topic` for as long as this node is mounted.
    pub fn subscribe_on_mount(
        &mut self,
        channel: &EventChannel,
        topic: &'static str,
        handler: impl Fn(&Value) -> anyhow::Result<()> + 'static,
    ) {
        self.declared.push(DeclaredSubscription {
            channel: channel.clone(),
            topic,
            handler: Rc::new(handler),
        });
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// Build a child from the current values of `bindings` and take
    /// ownership of it. The same bindings drive every later propagation.
    pub fn adopt<F>(
        &mut self,
        key: &'static str,
        bindings: Vec<(&'static str, Binding)>,
        build: F,
    ) -> Result<&mut ComponentNode, ConstructionError>
    where
        F: FnOnce(SlotValues) -> Result<ComponentNode, ConstructionError>,
    {
        let node = build(evaluate(&bindings))?;
        debug!(parent = self.name(), child = node.name(), key, "adopted child");
        self.children.push(ChildNode {
            key,
            node,
            bindings,
        });
        let index = self.children.len() - 1;
        Ok(&mut self.children[index].node)
    }

    pub fn child(&self, key: &str) -> Option<&ComponentNode> {
        self.children.iter().find(|c| c.key == key).map(|c| &c.node)
    }

    pub fn child_keys(&self) -> Vec<&'static str> {
        self.children.iter().map(|c| c.key).collect()
    }

    /// Descend by child keys separated with `/`. The empty path is `self`.
    pub fn find(&self, path: &str) -> Option<&ComponentNode> {
        split_path(path).try_fold(self, |node, key| node.child(key))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Wire declared subscriptions, then mount children. Idempotent.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        for declared in &self.declared {
            let handler = declared.handler.clone();
            let handle = declared
                .channel
                .subscribe(declared.topic, move |payload| handler(payload));
            self.active.push((declared.channel.clone(), handle));
        }
        self.mounted = true;
        info!(component = self.name(), subscriptions = self.active.len(), "mounted");

        for child in &mut self.children {
            child.node.mount();
        }
    }

    /// Children first, then this node's own subscriptions.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        for child in &mut self.children {
            child.node.unmount();
        }
        for (channel, handle) in self.active.drain(..) {
            channel.unsubscribe(handle);
        }
        self.mounted = false;
        info!(component = self.name(), "unmounted");
    }

    /// Called by the parent with fresh slot values. Writes only the slots
    /// that changed, then pushes this node's bindings down to its children.
    pub fn update(&mut self, values: &SlotValues) -> Result<bool, SlotError> {
        let changed = self.slots.apply(&self.schema, values)?;
        if changed {
            self.revision += 1;
            debug!(component = self.name(), revision = self.revision, "slots updated");
        }
        self.propagate()?;
        Ok(changed)
    }

    /// Re-evaluate every child's bindings and update it.
    pub fn propagate(&mut self) -> Result<(), SlotError> {
        for child in &mut self.children {
            let values = child.slot_values();
            child.node.update(&values)?;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_as(self.name())
    }

    fn snapshot_as(&self, key: &str) -> Snapshot {
        Snapshot {
            key: key.to_string(),
            component: self.name().to_string(),
            slots: self.slots.to_map(),
            state: self
                .state
                .iter()
                .map(|(name, reader)| (name.to_string(), reader.get()))
                .collect(),
            computed: self.computed.snapshot(),
            children: self
                .children
                .iter()
                .map(|c| c.node.snapshot_as(c.key))
                .collect(),
        }
    }
}

fn evaluate(bindings: &[(&'static str, Binding)]) -> SlotValues {
    bindings
        .iter()
        .map(|(slot, binding)| (*slot, binding.get()))
        .collect()
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

// =============================================================================
// Tests
// =============================================================================
