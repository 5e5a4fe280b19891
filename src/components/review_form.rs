//! Review Form - Collects a review and publishes it on the channel.
//!
//! The form has no slots. Its three inputs arrive through the `input`
//! interaction as `{ "field": "name" | "body" | "rating", "value": ... }`
//! and `submit` either publishes `review-submitted` and clears the inputs,
//! or fills `errors` with one message per bad field, in field order.
//!
//! Errors are rebuilt from scratch on every submit; editing a field does
//! not clear them.

use serde_json::{Value, json};
use tracing::debug;

use super::bad_payload;
use crate::engine::{Binding, ComponentNode, SlotSchema, SlotValues};
use crate::error::{ConstructionError, DispatchError};
use crate::reactive::Field;
use crate::state::EventChannel;
use crate::types::{INPUT, REVIEW_SUBMITTED, Rating, Review, SUBMIT};

pub const REVIEW_FORM: &str = "review-form";

pub const NAME_REQUIRED: &str = "Name required";
pub const REVIEW_REQUIRED: &str = "Review required";
pub const RATING_REQUIRED: &str = "Rating required";
pub const RATING_OUT_OF_RANGE: &str = "Rating must be between 1 and 5";

// =============================================================================
// Draft
// =============================================================================

/// Raw form contents before validation.
///
/// `rating` stays a JSON value because a select element hands over strings
/// while programmatic callers send integers; both are accepted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewDraft {
    pub name: String,
    pub body: String,
    pub rating: Value,
}

impl ReviewDraft {
    /// Build a [`Review`], or every message that applies, ordered
    /// name, body, rating.
    pub fn validate(&self) -> Result<Review, Vec<String>> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(NAME_REQUIRED.to_string());
        }
        if self.body.is_empty() {
            errors.push(REVIEW_REQUIRED.to_string());
        }
        let rating = parse_rating(&self.rating).map_err(|msg| errors.push(msg.to_string()));

        match rating {
            Ok(rating) if errors.is_empty() => Ok(Review {
                name: self.name.clone(),
                body: self.body.clone(),
                rating,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_rating(raw: &Value) -> Result<Rating, &'static str> {
    let parsed = match raw {
        Value::Null => return Err(RATING_REQUIRED),
        Value::String(s) if s.trim().is_empty() => return Err(RATING_REQUIRED),
        Value::String(s) => s.trim().parse::<u8>().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        _ => None,
    };
    parsed.and_then(Rating::new).ok_or(RATING_OUT_OF_RANGE)
}

// =============================================================================
// Component
// =============================================================================

pub fn review_form(
    channel: &EventChannel,
    slots: SlotValues,
) -> Result<ComponentNode, ConstructionError> {
    let mut node = ComponentNode::new(SlotSchema::new(REVIEW_FORM), slots)?;

    let name = Field::new(String::new());
    let body = Field::new(String::new());
    let rating = Field::new(Value::Null);
    let errors: Field<Vec<String>> = Field::new(Vec::new());

    node.expose("name", Binding::json(&name));
    node.expose("body", Binding::json(&body));
    node.expose("rating", rating.clone());
    node.expose("errors", Binding::json(&errors));

    let e = errors.clone();
    node.define("has_errors", [errors.dependency()], move || {
        json!(e.with(|errs| !errs.is_empty()))
    });

    {
        let (name, body, rating) = (name.clone(), body.clone(), rating.clone());
        node.on_interaction(INPUT, move |payload| {
            let field = payload
                .get("field")
                .and_then(Value::as_str)
                .ok_or_else(|| bad_payload(INPUT, "expected {field, value}", payload))?;
            let value = payload.get("value").cloned().unwrap_or(Value::Null);

            match field {
                "name" => name.set(input_text(&value)?),
                "body" => body.set(input_text(&value)?),
                "rating" => rating.set(value),
                other => return Err(bad_payload(INPUT, "unknown field", &json!(other))),
            }
            Ok(())
        });
    }

    let channel = channel.clone();
    node.on_interaction(SUBMIT, move |_| {
        let draft = ReviewDraft {
            name: name.get(),
            body: body.get(),
            rating: rating.get(),
        };

        match draft.validate() {
            Ok(review) => {
                errors.replace_if_changed(Vec::new());
                let payload =
                    serde_json::to_value(&review).map_err(|err| DispatchError::BadPayload {
                        interaction: SUBMIT,
                        reason: err.to_string(),
                    })?;
                let delivered = channel.publish(REVIEW_SUBMITTED, &payload);
                debug!(name = %review.name, delivered, "review submitted");

                name.set(String::new());
                body.set(String::new());
                rating.set(Value::Null);
            }
            Err(messages) => {
                debug!(errors = ?messages, "review rejected");
                errors.set(messages);
            }
        }
        Ok(())
    });

    Ok(node)
}

fn input_text(value: &Value) -> Result<String, DispatchError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        other => Err(bad_payload(INPUT, "expected text", other)),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (ComponentNode, EventChannel, Rc<RefCell<Vec<Value>>>) {
        let channel = EventChannel::new();
        let published = Rc::new(RefCell::new(Vec::new()));
        let published_clone = published.clone();
        channel.subscribe(REVIEW_SUBMITTED, move |payload| {
            published_clone.borrow_mut().push(payload.clone());
            Ok(())
        });
        let node = review_form(&channel, SlotValues::new()).unwrap();
        (node, channel, published)
    }

    fn input(node: &ComponentNode, field: &str, value: Value) {
        node.dispatch(INPUT, &json!({ "field": field, "value": value }))
            .unwrap();
    }

    fn fill(node: &ComponentNode, name: &str, body: &str, rating: Value) {
        input(node, "name", json!(name));
        input(node, "body", json!(body));
        input(node, "rating", rating);
    }

    #[test]
    fn test_valid_submit_publishes_and_clears() {
        let (node, _channel, published) = setup();
        fill(&node, "Ada", "Warm and soft", json!(5));

        node.dispatch(SUBMIT, &json!(null)).unwrap();

        assert_eq!(
            *published.borrow(),
            vec![json!({ "name": "Ada", "body": "Warm and soft", "rating": 5 })]
        );
        assert_eq!(node.state("name"), Some(json!("")));
        assert_eq!(node.state("body"), Some(json!("")));
        assert_eq!(node.state("rating"), Some(Value::Null));
        assert_eq!(node.state("errors"), Some(json!([])));
    }

    #[test]
    fn test_empty_submit_reports_all_in_order() {
        let (node, _channel, published) = setup();

        node.dispatch(SUBMIT, &json!(null)).unwrap();

        assert!(published.borrow().is_empty());
        assert_eq!(
            node.state("errors"),
            Some(json!([NAME_REQUIRED, REVIEW_REQUIRED, RATING_REQUIRED]))
        );
        assert_eq!(node.computed("has_errors"), Some(json!(true)));
    }

    #[test]
    fn test_failed_submit_keeps_inputs() {
        let (node, _channel, _) = setup();
        fill(&node, "Ada", "", json!(3));

        node.dispatch(SUBMIT, &json!(null)).unwrap();

        assert_eq!(node.state("errors"), Some(json!([REVIEW_REQUIRED])));
        assert_eq!(node.state("name"), Some(json!("Ada")));
    }

    #[test]
    fn test_resubmit_rebuilds_errors() {
        let (node, _channel, published) = setup();

        node.dispatch(SUBMIT, &json!(null)).unwrap();
        fill(&node, "Ada", "Soft", json!(null));
        // Editing does not clear earlier errors
        assert_eq!(
            node.state("errors"),
            Some(json!([NAME_REQUIRED, REVIEW_REQUIRED, RATING_REQUIRED]))
        );

        node.dispatch(SUBMIT, &json!(null)).unwrap();
        assert_eq!(node.state("errors"), Some(json!([RATING_REQUIRED])));

        input(&node, "rating", json!("4"));
        node.dispatch(SUBMIT, &json!(null)).unwrap();
        assert_eq!(node.state("errors"), Some(json!([])));
        assert_eq!(published.borrow().len(), 1);
        assert_eq!(published.borrow()[0]["rating"], 4);
    }

    #[test]
    fn test_rating_out_of_range() {
        let (node, _channel, published) = setup();
        fill(&node, "Ada", "Soft", json!(9));

        node.dispatch(SUBMIT, &json!(null)).unwrap();

        assert!(published.borrow().is_empty());
        assert_eq!(node.state("errors"), Some(json!([RATING_OUT_OF_RANGE])));
    }

    #[test]
    fn test_whitespace_counts_as_filled() {
        let (node, _channel, published) = setup();
        fill(&node, "  ", " ", json!(3));

        node.dispatch(SUBMIT, &json!(null)).unwrap();

        assert_eq!(node.state("errors"), Some(json!([])));
        assert_eq!(published.borrow().len(), 1);
        assert_eq!(published.borrow()[0]["name"], json!("  "));
    }

    #[test]
    fn test_bad_input_payloads() {
        let (node, _channel, _) = setup();
        assert!(node.dispatch(INPUT, &json!("name")).is_err());
        assert!(node.dispatch(INPUT, &json!({ "field": "email", "value": "x" })).is_err());
        assert!(node.dispatch(INPUT, &json!({ "field": "name", "value": 3 })).is_err());
    }

    #[test]
    fn test_parse_rating_accepts_strings_and_numbers() {
        assert_eq!(parse_rating(&json!(3)).map(Rating::get), Ok(3));
        assert_eq!(parse_rating(&json!(" 2 ")).map(Rating::get), Ok(2));
        assert_eq!(parse_rating(&json!("")), Err(RATING_REQUIRED));
        assert_eq!(parse_rating(&json!(0)), Err(RATING_OUT_OF_RANGE));
        assert_eq!(parse_rating(&json!(4.5)), Err(RATING_OUT_OF_RANGE));
        assert_eq!(parse_rating(&json!("five")), Err(RATING_OUT_OF_RANGE));
    }

    fn field_text(valid: bool) -> BoxedStrategy<String> {
        if valid {
            "[A-Za-z][A-Za-z ]{0,12}".boxed()
        } else {
            Just(String::new()).boxed()
        }
    }

    fn rating_value(valid: bool) -> BoxedStrategy<Value> {
        if valid {
            prop_oneof![
                (1u8..=5).prop_map(|n| json!(n)),
                (1u8..=5).prop_map(|n| json!(n.to_string())),
            ]
            .boxed()
        } else {
            prop_oneof![Just(Value::Null), Just(json!("")), Just(json!(0)), Just(json!(6))].boxed()
        }
    }

    fn draft_case() -> impl Strategy<Value = (bool, bool, bool, ReviewDraft)> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_flat_map(|(n, b, r)| {
            (field_text(n), field_text(b), rating_value(r)).prop_map(move |(name, body, rating)| {
                (n, b, r, ReviewDraft { name, body, rating })
            })
        })
    }

    proptest! {
        #[test]
        fn prop_submit_publishes_iff_valid((name_ok, body_ok, rating_ok, draft) in draft_case()) {
            let (node, _channel, published) = setup();
            fill(&node, &draft.name, &draft.body, draft.rating.clone());

            node.dispatch(SUBMIT, &json!(null)).unwrap();

            let all_valid = name_ok && body_ok && rating_ok;
            prop_assert_eq!(published.borrow().len(), usize::from(all_valid));

            let errors = node.state("errors").unwrap();
            let errors = errors.as_array().unwrap();
            let expected = [!name_ok, !body_ok, !rating_ok].iter().filter(|bad| **bad).count();
            prop_assert_eq!(errors.len(), expected);

            if all_valid {
                prop_assert_eq!(node.state("name"), Some(json!("")));
                prop_assert_eq!(node.state("body"), Some(json!("")));
                prop_assert_eq!(node.state("rating"), Some(Value::Null));
            } else {
                let order: Vec<&str> = errors.iter().filter_map(Value::as_str).collect();
                let mut want = Vec::new();
                if !name_ok { want.push(NAME_REQUIRED); }
                if !body_ok { want.push(REVIEW_REQUIRED); }
                if !rating_ok {
                    let msg = if draft.rating.is_null() || draft.rating == json!("") {
                        RATING_REQUIRED
                    } else {
                        RATING_OUT_OF_RANGE
                    };
                    want.push(msg);
                }
                prop_assert_eq!(order, want);
            }
        }
    }
}
