//! Product Details - Bullet list of material and fit notes.

use serde_json::json;

use crate::engine::{ComponentNode, SlotKind, SlotSchema, SlotSpec, SlotValues};
use crate::error::ConstructionError;

pub const PRODUCT_DETAILS: &str = "product-details";

pub fn schema() -> SlotSchema {
    SlotSchema::new(PRODUCT_DETAILS).slot(SlotSpec::required("details", SlotKind::List))
}

pub fn product_details(slots: SlotValues) -> Result<ComponentNode, ConstructionError> {
    let mut node = ComponentNode::new(schema(), slots)?;

    let details = node.slot_field("details")?;
    let d = details.clone();
    node.define("detail_count", [details.dependency()], move || {
        json!(d.with(|v| v.as_array().map_or(0, Vec::len)))
    });

    Ok(node)
}
