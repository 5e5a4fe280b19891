//! Versioned mutable fields.
//!
//! A [`Field`] is the only kind of mutable state a component holds. Every
//! write bumps the field's version counter, which is what [`Computed`]
//! values compare against to decide whether their cache is stale.
//!
//! # Example
//!
//! ```ignore
//! use spark_storefront::reactive::Field;
//!
//! let selected = Field::new(0usize);
//! assert_eq!(selected.version(), 0);
//!
//! selected.set(1);
//! assert_eq!(selected.get(), 1);
//! assert_eq!(selected.version(), 1);
//! ```
//!
//! [`Computed`]: super::Computed

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// Identity
// =============================================================================

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one field or computed value for dependency bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u64);

impl FieldId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

// =============================================================================
// Tracked
// =============================================================================

/// Anything a derivation can declare in its read set.
pub trait Tracked {
    fn field_id(&self) -> FieldId;

    /// Current write version. Monotonically increasing.
    fn version(&self) -> u64;
}

/// Type-erased entry of a read set.
pub type Dependency = Rc<dyn Tracked>;

// =============================================================================
// Field
// =============================================================================

struct FieldCell<T> {
    id: FieldId,
    value: RefCell<T>,
    version: Cell<u64>,
}

impl<T> FieldCell<T> {
    fn bump(&self) {
        self.version.set(self.version.get() + 1);
    }
}

impl<T> Tracked for FieldCell<T> {
    fn field_id(&self) -> FieldId {
        self.id
    }

    fn version(&self) -> u64 {
        self.version.get()
    }
}

/// Shared handle to a versioned value. Clones point at the same cell.
pub struct Field<T> {
    cell: Rc<FieldCell<T>>,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("id", &self.cell.id)
            .field("version", &self.cell.version.get())
            .field("value", &*self.cell.value.borrow())
            .finish()
    }
}

impl<T: 'static> Field<T> {
    /// A fresh field at version 0 with its own id.
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(FieldCell {
                id: FieldId::next(),
                value: RefCell::new(value),
                version: Cell::new(0),
            }),
        }
    }

    pub fn id(&self) -> FieldId {
        self.cell.id
    }

    /// Number of writes so far.
    pub fn version(&self) -> u64 {
        self.cell.version.get()
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.value.borrow())
    }

    /// Overwrite the value. Always counts as a write.
    pub fn set(&self, value: T) {
        *self.cell.value.borrow_mut() = value;
        self.cell.bump();
    }

    /// Mutate in place. Always counts as a write.
    ///
    /// `f` must not read this same field.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.cell.value.borrow_mut());
        self.cell.bump();
    }

    /// This field as a read-set entry.
    pub fn dependency(&self) -> Dependency {
        self.cell.clone()
    }
}

impl<T: Clone + 'static> Field<T> {
    /// Clone out the current value.
    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }
}

impl<T: PartialEq + 'static> Field<T> {
    /// Write only when the value differs. Returns whether a write happened.
    pub fn replace_if_changed(&self, value: T) -> bool {
        if *self.cell.value.borrow() == value {
            return false;
        }
        self.set(value);
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
