//! Reactive core - Versioned fields and lazily derived values.
//!
//! - [`Field`] - Mutable cell with a per-write version counter
//! - [`Computed`] - Memoized derivation over a declared read set
//! - [`ComputedTable`] - Name-keyed computed values for one component
//!
//! # Pull Model
//!
//! ```text
//! Field::set → version += 1 ──(no push)──  Computed::get → compare versions → maybe re-run
//! ```
//!
//! Nothing is recomputed eagerly. Two reads with no intervening write to a
//! declared dependency return the cached value without running the
//! derivation again.

mod computed;
mod field;
mod table;

pub use computed::Computed;
pub use field::{Dependency, Field, FieldId, Tracked};
pub use table::ComputedTable;
