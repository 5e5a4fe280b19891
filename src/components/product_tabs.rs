//! Product Tabs - Review | Make a review.
//!
//! Shows the reviews handed down by the product, or the review form. The
//! form talks to the product only through the channel; this node never
//! sees a submission.

use serde_json::json;

use super::review_form::review_form;
use super::{bad_payload, text_payload};
use crate::engine::{Binding, ComponentNode, SlotKind, SlotSchema, SlotSpec, SlotValues};
use crate::error::ConstructionError;
use crate::state::{EventChannel, TabSelection};
use crate::types::CLICK;

pub const PRODUCT_TABS: &str = "product-tabs";

pub const REVIEW_TABS: &[&str] = &["Review", "Make a review"];

const EMPTY_MESSAGE: &str = "There are no reviews yet";

pub fn schema() -> SlotSchema {
    SlotSchema::new(PRODUCT_TABS).slot(SlotSpec::required("reviews", SlotKind::List))
}

pub fn product_tabs(
    channel: &EventChannel,
    slots: SlotValues,
) -> Result<ComponentNode, ConstructionError> {
    let mut node = ComponentNode::new(schema(), slots)?;
    let tabs = TabSelection::new(REVIEW_TABS);

    node.expose("tabs", json!(REVIEW_TABS));
    {
        let tabs = tabs.clone();
        node.expose("selected_tab", Binding::getter(move || json!(tabs.active())));
    }

    let reviews = node.slot_field("reviews")?;
    let r = reviews.clone();
    let review_count = node.define("review_count", [reviews.dependency()], move || {
        json!(r.with(|v| v.as_array().map_or(0, Vec::len)))
    });

    let count = review_count.clone();
    let has_reviews = node.define("has_reviews", [review_count.dependency()], move || {
        json!(count.get().as_u64().unwrap_or(0) > 0)
    });

    let has = has_reviews.clone();
    node.define("empty_message", [has_reviews.dependency()], move || {
        if has.get().as_bool().unwrap_or(false) {
            json!(null)
        } else {
            json!(EMPTY_MESSAGE)
        }
    });

    for (name, label) in [("show_reviews", REVIEW_TABS[0]), ("show_form", REVIEW_TABS[1])] {
        let t = tabs.clone();
        node.define(name, [tabs.dependency()], move || json!(t.is_active(label)));
    }

    node.on_interaction(CLICK, move |payload| {
        let label = text_payload(CLICK, payload)?;
        if tabs.click(label) {
            Ok(())
        } else {
            Err(bad_payload(CLICK, "unknown tab", payload))
        }
    });

    let channel = channel.clone();
    node.adopt("review-form", Vec::new(), |values| review_form(&channel, values))?;

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlotError;
    use crate::types::{INPUT, REVIEW_SUBMITTED, SUBMIT};

    fn setup() -> (ComponentNode, EventChannel) {
        let channel = EventChannel::new();
        let node = product_tabs(&channel, SlotValues::from([("reviews", json!([]))])).unwrap();
        (node, channel)
    }

    #[test]
    fn test_requires_reviews() {
        let err = product_tabs(&EventChannel::new(), SlotValues::new()).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::new(PRODUCT_TABS, SlotError::Missing { slot: "reviews" })
        );
    }

    #[test]
    fn test_empty_reviews_message() {
        let (node, _) = setup();
        assert_eq!(node.computed("has_reviews"), Some(json!(false)));
        assert_eq!(node.computed("review_count"), Some(json!(0)));
        assert_eq!(node.computed("empty_message"), Some(json!(EMPTY_MESSAGE)));
    }

    #[test]
    fn test_reviews_slot_update() {
        let (mut node, _) = setup();
        node.update(&SlotValues::from([(
            "reviews",
            json!([{ "name": "Ada", "body": "Warm", "rating": 5 }]),
        )]))
        .unwrap();

        assert_eq!(node.computed("review_count"), Some(json!(1)));
        assert_eq!(node.computed("has_reviews"), Some(json!(true)));
        assert_eq!(node.computed("empty_message"), Some(json!(null)));
    }

    #[test]
    fn test_tab_click() {
        let (node, _) = setup();
        assert_eq!(node.computed("show_reviews"), Some(json!(true)));

        node.dispatch(CLICK, &json!("Make a review")).unwrap();
        assert_eq!(node.state("selected_tab"), Some(json!("Make a review")));
        assert_eq!(node.computed("show_form"), Some(json!(true)));
        assert_eq!(node.computed("show_reviews"), Some(json!(false)));

        assert!(node.dispatch(CLICK, &json!("Questions")).is_err());
    }

    #[test]
    fn test_form_child_publishes_on_channel() {
        let (node, channel) = setup();
        let form = node.child("review-form").unwrap();

        let inputs = [("name", json!("Ada")), ("body", json!("Warm")), ("rating", json!(4))];
        for (field, value) in inputs {
            form.dispatch(INPUT, &json!({ "field": field, "value": value }))
                .unwrap();
        }

        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        let hits_clone = hits.clone();
        channel.subscribe(REVIEW_SUBMITTED, move |_| {
            hits_clone.set(hits_clone.get() + 1);
            Ok(())
        });

        form.dispatch(SUBMIT, &json!(null)).unwrap();
        assert_eq!(hits.get(), 1);
    }
}
