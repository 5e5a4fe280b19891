//! Error types.
//!
//! Form validation is deliberately absent here: a rejected review is state
//! on the form (an ordered message list), not an `Err`.

use std::path::PathBuf;

use thiserror::Error as ThisError;

use crate::types::VariantId;

// =============================================================================
// SlotError
// =============================================================================

/// A slot value was missing, mistyped, or refused by its schema.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SlotError {
    #[error("required slot `{slot}` was not supplied")]
    Missing { slot: &'static str },

    #[error("slot `{slot}` expects {expected}, got {found}")]
    WrongKind {
        slot: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("slot `{slot}` rejected its value: {reason}")]
    Rejected { slot: &'static str, reason: String },

    #[error("slot `{slot}` is not declared")]
    Unknown { slot: String },
}

// =============================================================================
// ConstructionError
// =============================================================================

/// A component could not be instantiated. Fatal for the whole tree.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConstructionError {
    #[error("cannot construct `{component}`: {source}")]
    Slot {
        component: &'static str,
        #[source]
        source: SlotError,
    },

    #[error("cannot construct `{component}` from its seed: {source}")]
    Seed {
        component: &'static str,
        #[source]
        source: CatalogError,
    },
}

impl ConstructionError {
    pub fn new(component: &'static str, source: SlotError) -> Self {
        Self::Slot { component, source }
    }

    pub fn seed(component: &'static str, source: CatalogError) -> Self {
        Self::Seed { component, source }
    }

    /// The component whose construction failed.
    pub fn component(&self) -> &'static str {
        match self {
            Self::Slot { component, .. } | Self::Seed { component, .. } => *component,
        }
    }
}

// =============================================================================
// CatalogError
// =============================================================================

/// The variant list of a product seed is unusable.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CatalogError {
    #[error("a catalog needs at least one variant")]
    Empty,

    #[error("variant id {0} appears more than once")]
    DuplicateId(VariantId),

    #[error("no variant with id {0}")]
    UnknownId(VariantId),
}

// =============================================================================
// SelectionError
// =============================================================================

/// A variant or tab index past the end of its list.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("index {index} is out of range for {len} entries")]
pub struct SelectionError {
    pub index: usize,
    pub len: usize,
}

// =============================================================================
// DispatchError
// =============================================================================

/// Returned to the rendering layer when an interaction cannot be routed
/// or its transition is refused.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DispatchError {
    #[error("no component at `{0}`")]
    UnknownNode(String),

    #[error("`{component}` has no `{interaction}` interaction")]
    UnknownInteraction {
        component: &'static str,
        interaction: String,
    },

    #[error("bad payload for `{interaction}`: {reason}")]
    BadPayload {
        interaction: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Rejected(#[from] SelectionError),

    #[error(transparent)]
    Slot(#[from] SlotError),
}

// =============================================================================
// ConfigError
// =============================================================================

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed store config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid product seed: {0}")]
    Invalid(#[from] CatalogError),
}

// =============================================================================
// Tests
// =============================================================================
