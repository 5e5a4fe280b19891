//! Storefront components - The concrete tree built on the engine.
//!
//! ```text
//! app                      cart, premium flag
//! └── product              catalog, reviews, title/image/stock/shipping
//!     ├── details-tab      Shipping | Details tabs, variant hover
//!     │   └── product-details
//!     └── product-tabs     Review | Make a review tabs
//!         └── review-form  publishes review-submitted
//! ```
//!
//! Each constructor takes the slot values its parent evaluated and returns
//! a [`ComponentNode`](crate::engine::ComponentNode), or a construction
//! error if a required slot is missing.

mod app;
mod details_tab;
mod product;
mod product_details;
mod product_tabs;
mod review_form;

pub use app::{APP, app};
pub use details_tab::{DETAILS_TAB, DETAILS_TABS, details_tab};
pub use product::{PRODUCT, product};
pub use product_details::{PRODUCT_DETAILS, product_details};
pub use product_tabs::{PRODUCT_TABS, REVIEW_TABS, product_tabs};
pub use review_form::{REVIEW_FORM, ReviewDraft, review_form};

use serde_json::Value;

use crate::error::DispatchError;
use crate::types::VariantId;

// =============================================================================
// Payload helpers
// =============================================================================

pub(crate) fn index_payload(
    interaction: &'static str,
    payload: &Value,
) -> Result<usize, DispatchError> {
    payload
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| bad_payload(interaction, "expected a non-negative index", payload))
}

pub(crate) fn text_payload<'a>(
    interaction: &'static str,
    payload: &'a Value,
) -> Result<&'a str, DispatchError> {
    payload
        .as_str()
        .ok_or_else(|| bad_payload(interaction, "expected text", payload))
}

pub(crate) fn bool_payload(
    interaction: &'static str,
    payload: &Value,
) -> Result<bool, DispatchError> {
    payload
        .as_bool()
        .ok_or_else(|| bad_payload(interaction, "expected a bool", payload))
}

pub(crate) fn variant_id_payload(payload: &Value) -> Option<VariantId> {
    payload.as_u64().map(VariantId)
}

pub(crate) fn bad_payload(
    interaction: &'static str,
    expected: &str,
    payload: &Value,
) -> DispatchError {
    DispatchError::BadPayload {
        interaction,
        reason: format!("{expected}, got {payload}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_payload() {
        assert_eq!(index_payload("hover", &json!(1)).unwrap(), 1);
        assert!(index_payload("hover", &json!(-1)).is_err());
        assert!(index_payload("hover", &json!("1")).is_err());
    }

    #[test]
    fn test_text_and_bool_payload() {
        assert_eq!(text_payload("click", &json!("Details")).unwrap(), "Details");
        assert!(text_payload("click", &json!(3)).is_err());
        assert!(bool_payload("set-premium", &json!(true)).unwrap());
        assert!(bool_payload("set-premium", &json!(null)).is_err());
    }
}
