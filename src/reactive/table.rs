//! Name-keyed computed values for one component.
//!
//! Components expose their derived values to the rendering layer by name.
//! The table stores each one as a [`Computed<Value>`] so a snapshot can be
//! assembled without knowing the concrete types involved.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use super::computed::Computed;
use super::field::Dependency;

#[derive(Debug, Default)]
pub struct ComputedTable {
    entries: BTreeMap<&'static str, Computed<Value>>,
}

impl ComputedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. Redefining a name replaces the earlier derivation.
    pub fn define(
        &mut self,
        name: &'static str,
        read_set: impl IntoIterator<Item = Dependency>,
        derive: impl Fn() -> Value + 'static,
    ) -> Computed<Value> {
        let computed = Computed::new(read_set, derive);
        if self.entries.insert(name, computed.clone()).is_some() {
            warn!(computed = name, "computed value redefined");
        }
        computed
    }

    /// Current value of `name`, recomputed only if a dependency moved.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.get(name).map(Computed::get)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every value, freshened.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries
            .iter()
            .map(|(name, computed)| (name.to_string(), computed.get()))
            .collect()
    }
}
