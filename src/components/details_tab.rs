//! Details Tab - Stock badge plus Shipping | Details tabs.
//!
//! The Details tab lists product details and one color box per variant.
//! Hovering a color box does not select anything here; it emits
//! `select-variant` and leaves the decision to the product node that owns
//! the catalog.

use serde_json::{Value, json};

use super::product_details::product_details;
use super::{bad_payload, index_payload, text_payload};
use crate::engine::{Binding, ComponentNode, SlotKind, SlotSchema, SlotSpec, SlotValues};
use crate::error::ConstructionError;
use crate::state::TabSelection;
use crate::types::{CLICK, HOVER, SELECT_VARIANT};

pub const DETAILS_TAB: &str = "details-tab";

pub const DETAILS_TABS: &[&str] = &["Shipping", "Details"];

pub fn schema() -> SlotSchema {
    SlotSchema::new(DETAILS_TAB)
        .slot(SlotSpec::required("shipping", SlotKind::Text))
        .slot(SlotSpec::optional("in_stock", SlotKind::Bool, json!(true)))
        .slot(SlotSpec::required("sale", SlotKind::Text))
        .slot(SlotSpec::required("details", SlotKind::List))
        .slot(SlotSpec::required("variants", SlotKind::List).non_empty())
}

pub fn details_tab(slots: SlotValues) -> Result<ComponentNode, ConstructionError> {
    let mut node = ComponentNode::new(schema(), slots)?;
    let tabs = TabSelection::new(DETAILS_TABS);

    node.expose("tabs", json!(DETAILS_TABS));
    {
        let tabs = tabs.clone();
        node.expose("selected_tab", Binding::getter(move || json!(tabs.active())));
    }

    let in_stock = node.slot_field("in_stock")?;
    node.define("stock_label", [in_stock.dependency()], move || {
        if in_stock.with(|v| v.as_bool().unwrap_or(true)) {
            json!("In Stock")
        } else {
            json!("Out of Stock")
        }
    });

    for (name, label) in [("show_shipping", DETAILS_TABS[0]), ("show_details", DETAILS_TABS[1])] {
        let t = tabs.clone();
        node.define(name, [tabs.dependency()], move || json!(t.is_active(label)));
    }

    let variants = node.slot_field("variants")?;
    let v = variants.clone();
    node.define("swatches", [variants.dependency()], move || {
        v.with(|list| {
            Value::Array(
                list.as_array()
                    .map(|items| items.iter().map(|item| item["color"].clone()).collect())
                    .unwrap_or_default(),
            )
        })
    });

    node.on_interaction(CLICK, move |payload| {
        let label = text_payload(CLICK, payload)?;
        if tabs.click(label) {
            Ok(())
        } else {
            Err(bad_payload(CLICK, "unknown tab", payload))
        }
    });

    let emitter = node.emitter();
    node.on_interaction(HOVER, move |payload| {
        let index = index_payload(HOVER, payload)?;
        emitter.emit(SELECT_VARIANT, json!(index));
        Ok(())
    });

    let details = node.slot_field("details")?;
    node.adopt(
        "product-details",
        vec![("details", Binding::from(details))],
        product_details,
    )?;

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DispatchError, SlotError};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn slots() -> SlotValues {
        SlotValues::from([
            ("shipping", json!("2.99")),
            ("sale", json!("Vue Mastery Socks are not on Sale!")),
            ("details", json!(["80% cotton", "20% polyester"])),
            (
                "variants",
                json!([
                    { "id": 2234, "color": "green", "image": "g.jpeg", "quantity": 10 },
                    { "id": 2235, "color": "blue", "image": "b.jpeg", "quantity": 0 }
                ]),
            ),
        ])
    }

    #[test]
    fn test_in_stock_defaults_true() {
        let node = details_tab(slots()).unwrap();
        assert_eq!(node.slot("in_stock"), Some(json!(true)));
        assert_eq!(node.computed("stock_label"), Some(json!("In Stock")));
    }

    #[test]
    fn test_missing_shipping_is_fatal() {
        let mut values = slots();
        values.remove("shipping");
        let err = details_tab(values).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::new(DETAILS_TAB, SlotError::Missing { slot: "shipping" })
        );
    }

    #[test]
    fn test_stock_label_follows_slot() {
        let mut node = details_tab(slots()).unwrap();
        let mut next = slots();
        next.insert("in_stock", json!(false));

        node.update(&next).unwrap();
        assert_eq!(node.computed("stock_label"), Some(json!("Out of Stock")));
    }

    #[test]
    fn test_tab_click() {
        let node = details_tab(slots()).unwrap();
        assert_eq!(node.state("selected_tab"), Some(json!("Shipping")));
        assert_eq!(node.computed("show_shipping"), Some(json!(true)));

        node.dispatch(CLICK, &json!("Details")).unwrap();
        assert_eq!(node.state("selected_tab"), Some(json!("Details")));
        assert_eq!(node.computed("show_shipping"), Some(json!(false)));
        assert_eq!(node.computed("show_details"), Some(json!(true)));
    }

    #[test]
    fn test_unknown_tab_rejected() {
        let node = details_tab(slots()).unwrap();
        let err = node.dispatch(CLICK, &json!("Returns")).unwrap_err();
        assert!(matches!(err, DispatchError::BadPayload { interaction: "click", .. }));
        assert_eq!(node.state("selected_tab"), Some(json!("Shipping")));
    }

    #[test]
    fn test_hover_emits_select_variant() {
        let node = details_tab(slots()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        node.on(SELECT_VARIANT, move |payload| seen_clone.borrow_mut().push(payload.clone()));

        node.dispatch(HOVER, &json!(1)).unwrap();
        assert_eq!(*seen.borrow(), vec![json!(1)]);
    }

    #[test]
    fn test_swatches_and_child() {
        let node = details_tab(slots()).unwrap();
        assert_eq!(node.computed("swatches"), Some(json!(["green", "blue"])));

        let details = node.child("product-details").unwrap();
        assert_eq!(details.computed("detail_count"), Some(json!(2)));
    }
}
