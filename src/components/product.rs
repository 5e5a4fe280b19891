//! Product - Owner of the variant catalog and the review store.
//!
//! The product node is the only writer of both. Everything below it gets
//! read-only slot values; everything above it hears about cart intent
//! through `add-to-cart` / `remove-from-cart`.
//!
//! Reviews arrive sideways: the node subscribes to `review-submitted` when
//! it mounts, so a form several levels down can publish without knowing
//! who listens.

use serde_json::{Value, json};
use tracing::{debug, warn};

use super::details_tab::details_tab;
use super::product_tabs::product_tabs;
use super::{bad_payload, index_payload, variant_id_payload};
use crate::config::ProductSeed;
use crate::engine::{Binding, ComponentNode, SlotKind, SlotSchema, SlotSpec, SlotValues};
use crate::error::{ConstructionError, DispatchError};
use crate::reactive::Field;
use crate::state::{EventChannel, ReviewStore, VariantCatalog};
use crate::types::{
    ADD_TO_CART, HOVER, REMOVE_FROM_CART, REVIEW_SUBMITTED, SELECT, SELECT_VARIANT, SET_QUANTITY,
};

pub const PRODUCT: &str = "product";

const FREE_SHIPPING: &str = "Free";
const STANDARD_SHIPPING: &str = "2.99";

pub fn schema() -> SlotSchema {
    SlotSchema::new(PRODUCT).slot(SlotSpec::required("premium", SlotKind::Bool))
}

pub fn product(
    channel: &EventChannel,
    seed: &ProductSeed,
    slots: SlotValues,
) -> Result<ComponentNode, ConstructionError> {
    let mut node = ComponentNode::new(schema(), slots)?;
    let catalog = VariantCatalog::new(seed.variants.clone())
        .map_err(|source| ConstructionError::seed(PRODUCT, source))?;
    let reviews = ReviewStore::new();

    let brand = Field::new(seed.brand.clone());
    let name = Field::new(seed.name.clone());
    let on_sale = Field::new(seed.on_sale);
    let details = Field::new(seed.details.clone());

    // =========================================================================
    // State
    // =========================================================================

    node.expose("brand", Binding::json(&brand));
    node.expose("name", Binding::json(&name));
    node.expose("alt_text", json!(seed.alt_text));
    node.expose("on_sale", Binding::json(&on_sale));
    node.expose("details", Binding::json(&details));
    {
        let catalog = catalog.clone();
        node.expose("selected_variant", Binding::getter(move || json!(catalog.selected_index())));
    }
    {
        let catalog = catalog.clone();
        node.expose("variants", Binding::getter(move || catalog.to_value()));
    }
    {
        let reviews = reviews.clone();
        node.expose("reviews", Binding::getter(move || reviews.to_value()));
    }

    // =========================================================================
    // Computed
    // =========================================================================

    let title = {
        let (b, n) = (brand.clone(), name.clone());
        node.define("title", [brand.dependency(), name.dependency()], move || {
            json!(format!("{} {}", b.get(), n.get()))
        })
    };

    let c = catalog.clone();
    node.define("image", catalog.dependencies(), move || json!(c.selected().image));

    let c = catalog.clone();
    let in_stock = node.define("in_stock", catalog.dependencies(), move || {
        json!(c.selected().in_stock())
    });

    let sale = {
        let (t, s) = (title.clone(), on_sale.clone());
        node.define("sale", [title.dependency(), on_sale.dependency()], move || {
            let title = t.get();
            let title = title.as_str().unwrap_or_default();
            if s.get() {
                json!(format!("{title} are on Sale!"))
            } else {
                json!(format!("{title} are not on Sale!"))
            }
        })
    };

    let premium = node.slot_field("premium")?;
    let p = premium.clone();
    let shipping = node.define("shipping", [premium.dependency()], move || {
        if p.with(|v| v.as_bool().unwrap_or(false)) {
            json!(FREE_SHIPPING)
        } else {
            json!(STANDARD_SHIPPING)
        }
    });

    // =========================================================================
    // Interactions
    // =========================================================================

    for event in [ADD_TO_CART, REMOVE_FROM_CART] {
        let (catalog, emitter) = (catalog.clone(), node.emitter());
        node.on_interaction(event, move |_| {
            let id = catalog.selected().id;
            debug!(event, %id, "cart intent");
            emitter.emit(event, json!(id));
            Ok(())
        });
    }

    for interaction in [HOVER, SELECT] {
        let catalog = catalog.clone();
        node.on_interaction(interaction, move |payload| {
            let index = index_payload(interaction, payload)?;
            catalog.select(index)?;
            Ok(())
        });
    }

    {
        let catalog = catalog.clone();
        node.on_interaction(SET_QUANTITY, move |payload| {
            let id = payload.get("id").and_then(variant_id_payload);
            let quantity = payload
                .get("quantity")
                .and_then(Value::as_u64)
                .and_then(|q| u32::try_from(q).ok());
            let (Some(id), Some(quantity)) = (id, quantity) else {
                return Err(bad_payload(SET_QUANTITY, "expected {id, quantity}", payload));
            };
            catalog
                .set_quantity(id, quantity)
                .map_err(|err| DispatchError::BadPayload {
                    interaction: SET_QUANTITY,
                    reason: err.to_string(),
                })
        });
    }

    {
        let reviews = reviews.clone();
        node.subscribe_on_mount(channel, REVIEW_SUBMITTED, move |payload| {
            reviews.append_payload(payload)
        });
    }

    // =========================================================================
    // Children
    // =========================================================================

    let variants = {
        let catalog = catalog.clone();
        Binding::getter(move || catalog.to_value())
    };
    let tab = node.adopt(
        "details-tab",
        vec![
            ("shipping", Binding::from(shipping)),
            ("in_stock", Binding::from(in_stock)),
            ("sale", Binding::from(sale)),
            ("details", Binding::json(&details)),
            ("variants", variants),
        ],
        details_tab,
    )?;
    tab.on(SELECT_VARIANT, move |payload| {
        let Some(index) = payload.as_u64().and_then(|n| usize::try_from(n).ok()) else {
            warn!(%payload, "select-variant without an index");
            return;
        };
        if let Err(err) = catalog.select(index) {
            warn!(%err, "select-variant dropped");
        }
    });

    let channel = channel.clone();
    node.adopt(
        "product-tabs",
        vec![("reviews", Binding::getter(move || reviews.to_value()))],
        |values| product_tabs(&channel, values),
    )?;

    Ok(node)
}

// =============================================================================
// Tests
// =============================================================================
