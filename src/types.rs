//! Core types - Variants, reviews, and the event name contract.
//!
//! These are the plain data records that flow through the component tree.
//! Everything here is cheap to clone; components hand out copies, never
//! references into their own state.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Event Names
// =============================================================================

/// Channel topic carrying a freshly submitted [`Review`].
pub const REVIEW_SUBMITTED: &str = "review-submitted";

/// Emitted by the product node with the selected [`VariantId`].
pub const ADD_TO_CART: &str = "add-to-cart";

/// Emitted by the product node with the selected [`VariantId`].
pub const REMOVE_FROM_CART: &str = "remove-from-cart";

/// Emitted by the details tab with the hovered variant index.
pub const SELECT_VARIANT: &str = "select-variant";

// Interaction names the rendering layer calls back with.
pub const CLICK: &str = "click";
pub const HOVER: &str = "hover";
pub const SELECT: &str = "select";
pub const SUBMIT: &str = "submit";
pub const INPUT: &str = "input";
pub const SET_PREMIUM: &str = "set-premium";
pub const SET_QUANTITY: &str = "set-quantity";

// =============================================================================
// Variant
// =============================================================================

/// Identifier of one purchasable variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub u64);

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VariantId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One purchasable configuration of the product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub color: String,
    pub image: String,
    pub quantity: u32,
}

impl Variant {
    pub fn new(id: u64, color: &str, image: &str, quantity: u32) -> Self {
        Self {
            id: VariantId(id),
            color: color.to_string(),
            image: image.to_string(),
            quantity,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Review
// =============================================================================

/// Star rating, always within `1..=5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns `None` outside `1..=5`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("rating {value} is outside 1..=5"))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A submitted review. Immutable once stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    pub body: String,
    pub rating: Rating,
}

// =============================================================================
// Tests
// =============================================================================
