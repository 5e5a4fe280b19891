//! App - Root of the storefront tree.
//!
//! Holds the cart and the premium-shipping flag. The cart is written only
//! by the handlers registered here, in response to events the product
//! emits; nothing below the root reads it.

use serde_json::{Value, json};
use tracing::{debug, warn};

use super::product::product;
use super::{bool_payload, variant_id_payload};
use crate::config::StoreConfig;
use crate::engine::{Binding, ComponentNode, SlotSchema, SlotValues};
use crate::error::ConstructionError;
use crate::reactive::Field;
use crate::state::{Cart, EventChannel};
use crate::types::{ADD_TO_CART, REMOVE_FROM_CART, SET_PREMIUM};

pub const APP: &str = "app";

pub fn app(
    channel: &EventChannel,
    config: &StoreConfig,
) -> Result<ComponentNode, ConstructionError> {
    let mut node = ComponentNode::new(SlotSchema::new(APP), SlotValues::new())?;

    let premium = Field::new(Value::Bool(config.premium));
    let cart = Cart::new();

    node.expose("premium", premium.clone());
    {
        let cart = cart.clone();
        node.expose("cart", Binding::getter(move || cart.to_value()));
    }
    {
        let cart = cart.clone();
        node.expose("cart_size", Binding::getter(move || json!(cart.len())));
    }

    {
        let premium = premium.clone();
        node.on_interaction(SET_PREMIUM, move |payload| {
            let flag = bool_payload(SET_PREMIUM, payload)?;
            if premium.replace_if_changed(json!(flag)) {
                debug!(premium = flag, "premium shipping toggled");
            }
            Ok(())
        });
    }

    let seed = config.product.clone();
    let channel = channel.clone();
    let child = node.adopt(
        "product",
        vec![("premium", Binding::from(premium))],
        |values| product(&channel, &seed, values),
    )?;

    {
        let cart = cart.clone();
        child.on(ADD_TO_CART, move |payload| match variant_id_payload(payload) {
            Some(id) => cart.add(id),
            None => warn!(%payload, "add-to-cart without a variant id"),
        });
    }
    child.on(REMOVE_FROM_CART, move |payload| match variant_id_payload(payload) {
        Some(id) => {
            cart.remove(id);
        }
        None => warn!(%payload, "remove-from-cart without a variant id"),
    });

    Ok(node)
}
