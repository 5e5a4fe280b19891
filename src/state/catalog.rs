//! Variant Catalog - Purchasable variants and the current selection.
//!
//! The selection is a small state machine over `0..len`: `select(i)` moves
//! to `i`, re-selecting the current index is a no-op, and anything out of
//! range is refused without touching state. Quantities change only through
//! [`VariantCatalog::set_quantity`], the hook for an inventory feed.

use serde_json::{Value, json};
use tracing::debug;

use crate::error::{CatalogError, SelectionError};
use crate::reactive::{Dependency, Field};
use crate::types::{Variant, VariantId};

#[derive(Clone, Debug)]
pub struct VariantCatalog {
    variants: Field<Vec<Variant>>,
    selected: Field<usize>,
}

impl VariantCatalog {
    /// Needs at least one variant and unique ids. Starts at index 0.
    pub fn new(variants: Vec<Variant>) -> Result<Self, CatalogError> {
        validate(&variants)?;
        Ok(Self {
            variants: Field::new(variants),
            selected: Field::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.variants.with(Vec::len)
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index into the variant list; always in range.
    pub fn selected_index(&self) -> usize {
        self.selected.get()
    }

    /// The variant at the selected index.
    pub fn selected(&self) -> Variant {
        let index = self.selected.get();
        self.variants.with(|variants| variants[index].clone())
    }

    pub fn variants(&self) -> Vec<Variant> {
        self.variants.get()
    }

    /// Hover and click both land here.
    pub fn select(&self, index: usize) -> Result<(), SelectionError> {
        let len = self.len();
        if index >= len {
            return Err(SelectionError { index, len });
        }
        if self.selected.replace_if_changed(index) {
            debug!(index, "variant selected");
        }
        Ok(())
    }

    /// Overwrite the stock count of the variant with `id`.
    pub fn set_quantity(&self, id: VariantId, quantity: u32) -> Result<(), CatalogError> {
        let position = self
            .variants
            .with(|variants| variants.iter().position(|v| v.id == id))
            .ok_or(CatalogError::UnknownId(id))?;

        self.variants.update(|variants| variants[position].quantity = quantity);
        debug!(%id, quantity, "variant quantity updated");
        Ok(())
    }

    /// Read-set entries: the selection first, then the variant list.
    pub fn dependencies(&self) -> [Dependency; 2] {
        [self.selected.dependency(), self.variants.dependency()]
    }

    /// Variants as the list handed to child slots.
    pub fn to_value(&self) -> Value {
        self.variants.with(|variants| {
            Value::Array(
                variants
                    .iter()
                    .map(|v| {
                        json!({
                            "id": v.id,
                            "color": v.color,
                            "image": v.image,
                            "quantity": v.quantity,
                        })
                    })
                    .collect(),
            )
        })
    }
}

fn validate(variants: &[Variant]) -> Result<(), CatalogError> {
    if variants.is_empty() {
        return Err(CatalogError::Empty);
    }
    for (i, variant) in variants.iter().enumerate() {
        if variants[..i].iter().any(|earlier| earlier.id == variant.id) {
            return Err(CatalogError::DuplicateId(variant.id));
        }
    }
    Ok(())
}
