//! Cart - In-memory list of variant ids, owned by the root.
//!
//! One entry per add. Duplicates are allowed and stand for quantity.

use serde_json::Value;
use tracing::debug;

use crate::reactive::{Dependency, Field};
use crate::types::VariantId;

#[derive(Clone, Debug)]
pub struct Cart {
    entries: Field<Vec<VariantId>>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Self {
            entries: Field::new(Vec::new()),
        }
    }

    /// Append `id`. Duplicates are kept; the cart is a list, not a set.
    pub fn add(&self, id: VariantId) {
        self.entries.update(|entries| entries.push(id));
        debug!(%id, size = self.len(), "added to cart");
    }

    /// Drop the first entry equal to `id`. A miss leaves the cart untouched.
    pub fn remove(&self, id: VariantId) -> bool {
        let position = self.entries.with(|entries| entries.iter().position(|e| *e == id));
        let Some(position) = position else {
            debug!(%id, "remove missed; cart unchanged");
            return false;
        };
        self.entries.update(|entries| {
            entries.remove(position);
        });
        debug!(%id, size = self.len(), "removed from cart");
        true
    }

    /// Number of entries, counting duplicates.
    pub fn len(&self) -> usize {
        self.entries.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the entries in insertion order.
    pub fn entries(&self) -> Vec<VariantId> {
        self.entries.get()
    }

    pub fn dependency(&self) -> Dependency {
        self.entries.dependency()
    }

    /// The entries as a JSON array of ids.
    pub fn to_value(&self) -> Value {
        self.entries
            .with(|entries| Value::Array(entries.iter().map(|id| Value::from(id.0)).collect()))
    }
}
