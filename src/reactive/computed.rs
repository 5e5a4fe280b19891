//! Lazy, memoized derivations over declared read sets.
//!
//! A [`Computed`] owns a derivation function and the list of dependencies it
//! reads. On `get()` it compares each dependency's current version with the
//! version it saw during its last evaluation; only a newer write triggers a
//! re-run. There is no background work: staleness is discovered on read.
//!
//! # Limitations
//!
//! The read set is declared, not discovered. A derivation that reads a field
//! it did not declare will serve stale values after that field changes.
//! Cycles between computed values are not supported.
//!
//! # Example
//!
//! ```ignore
//! use spark_storefront::reactive::{Computed, Field};
//!
//! let brand = Field::new("Vue Mastery".to_string());
//! let name = Field::new("Socks".to_string());
//!
//! let (b, n) = (brand.clone(), name.clone());
//! let title = Computed::new(
//!     [brand.dependency(), name.dependency()],
//!     move || format!("{} {}", b.get(), n.get()),
//! );
//!
//! assert_eq!(title.get(), "Vue Mastery Socks");
//! name.set("Shoes".to_string());
//! assert_eq!(title.get(), "Vue Mastery Shoes");
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use super::field::{Dependency, FieldId, Tracked};

// =============================================================================
// Cache Entry
// =============================================================================

struct ComputedEntry<T> {
    value: T,
    /// Dependency versions observed at evaluation, parallel to the read set.
    seen: Vec<u64>,
    dirty: bool,
}

// =============================================================================
// Computed Cell
// =============================================================================

struct ComputedCell<T> {
    id: FieldId,
    derive: Box<dyn Fn() -> T>,
    read_set: Vec<Dependency>,
    entry: RefCell<Option<ComputedEntry<T>>>,
    version: Cell<u64>,
    evaluations: Cell<u64>,
}

impl<T> ComputedCell<T> {
    fn is_stale(&self) -> bool {
        let entry = self.entry.borrow();
        match entry.as_ref() {
            None => true,
            Some(entry) if entry.dirty => true,
            Some(entry) => self
                .read_set
                .iter()
                .zip(&entry.seen)
                .any(|(dep, seen)| dep.version() > *seen),
        }
    }

    fn evaluate(&self) -> ComputedEntry<T> {
        let seen = self.read_set.iter().map(|dep| dep.version()).collect();
        let value = (self.derive)();

        self.evaluations.set(self.evaluations.get() + 1);
        self.version.set(self.version.get() + 1);
        trace!(computed = %self.id, evaluations = self.evaluations.get(), "recomputed");

        ComputedEntry {
            value,
            seen,
            dirty: false,
        }
    }

    /// Run `f` against a fresh value, recomputing first if needed.
    fn with_current<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let stale = self.is_stale();
        let mut slot = self.entry.borrow_mut();
        if stale {
            *slot = None;
        }
        let entry = slot.get_or_insert_with(|| self.evaluate());
        f(&entry.value)
    }
}

impl<T> Tracked for ComputedCell<T> {
    fn field_id(&self) -> FieldId {
        self.id
    }

    /// Pulls upstream first so downstream derivations see a settled version.
    fn version(&self) -> u64 {
        self.with_current(|_| ());
        self.version.get()
    }
}

// =============================================================================
// Computed
// =============================================================================

/// Shared handle to a derived value. Clones share one cache.
pub struct Computed<T> {
    cell: Rc<ComputedCell<T>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("id", &self.cell.id)
            .field("reads", &self.cell.read_set.len())
            .field("evaluations", &self.cell.evaluations.get())
            .finish()
    }
}

impl<T: 'static> Computed<T> {
    /// Register a derivation. Nothing runs until the first read.
    pub fn new(
        read_set: impl IntoIterator<Item = Dependency>,
        derive: impl Fn() -> T + 'static,
    ) -> Self {
        Self {
            cell: Rc::new(ComputedCell {
                id: FieldId::next(),
                derive: Box::new(derive),
                read_set: read_set.into_iter().collect(),
                entry: RefCell::new(None),
                version: Cell::new(0),
                evaluations: Cell::new(0),
            }),
        }
    }

    /// Identifier this computed carries as a read-set entry.
    pub fn id(&self) -> FieldId {
        self.cell.id
    }

    /// Borrow the current value. `f` must not read this same computed.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.with_current(f)
    }

    /// Force the next read to re-evaluate regardless of versions.
    pub fn invalidate(&self) {
        if let Some(entry) = self.cell.entry.borrow_mut().as_mut() {
            entry.dirty = true;
        }
    }

    /// Whether the next read would re-run the derivation.
    pub fn is_stale(&self) -> bool {
        self.cell.is_stale()
    }

    /// How many times the derivation has run.
    pub fn evaluations(&self) -> u64 {
        self.cell.evaluations.get()
    }

    /// Identifiers of the declared read set.
    pub fn reads(&self) -> Vec<FieldId> {
        self.cell.read_set.iter().map(|dep| dep.field_id()).collect()
    }

    /// This computed as a read-set entry for another derivation.
    pub fn dependency(&self) -> Dependency {
        self.cell.clone()
    }
}

impl<T: Clone + 'static> Computed<T> {
    /// Current value, re-running the derivation if a read is newer.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

// =============================================================================
// Tests
// =============================================================================
