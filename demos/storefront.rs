//! Storefront Example - Drive a mounted tree the way a renderer would
//!
//! This example walks through the main flows:
//! - Selecting a variant and reading stock/image
//! - Adding and removing cart entries
//! - Submitting a review and seeing it reach the tabs
//! - Flipping premium shipping
//!
//! Run with: cargo run --example storefront [config.json]
//! Set RUST_LOG=spark_storefront=debug to see the dispatch trace.

use serde_json::json;
use spark_storefront::{
    ADD_TO_CART, CLICK, HOVER, INPUT, REMOVE_FROM_CART, SET_PREMIUM, SUBMIT, StoreConfig, mount,
};

const FORM: &str = "product/product-tabs/review-form";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spark_storefront=info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => StoreConfig::from_path(path)?,
        None => StoreConfig::default(),
    };

    println!("=== spark-storefront Example ===\n");

    let mut handle = mount(&config)?;
    let snapshot = handle.snapshot();
    if let Some(p) = snapshot.find("product") {
        println!(
            "{}: {} / in stock: {}",
            p.computed["title"], p.computed["image"], p.computed["in_stock"]
        );
    }

    // Hover the second color box
    handle.dispatch("product/details-tab", HOVER, &json!(1))?;
    let snapshot = handle.snapshot();
    if let Some(p) = snapshot.find("product") {
        println!(
            "after hover: {} / in stock: {}",
            p.computed["image"], p.computed["in_stock"]
        );
    }

    // Cart
    handle.dispatch("product", ADD_TO_CART, &json!(null))?;
    handle.dispatch("product", ADD_TO_CART, &json!(null))?;
    handle.dispatch("product", REMOVE_FROM_CART, &json!(null))?;
    println!("cart: {}", handle.snapshot().state["cart"]);

    // Empty submit reports every missing field
    handle.dispatch(FORM, SUBMIT, &json!(null))?;
    if let Some(form) = handle.snapshot().find(FORM) {
        println!("errors: {}", form.state["errors"]);
    }

    let inputs = [
        ("name", json!("Ada")),
        ("body", json!("Warm and soft")),
        ("rating", json!("5")),
    ];
    for (field, value) in inputs {
        handle.dispatch(FORM, INPUT, &json!({ "field": field, "value": value }))?;
    }
    handle.dispatch(FORM, SUBMIT, &json!(null))?;

    handle.dispatch("product/product-tabs", CLICK, &json!("Review"))?;
    if let Some(tabs) = handle.snapshot().find("product/product-tabs") {
        println!("reviews: {} ({})", tabs.slots["reviews"], tabs.computed["review_count"]);
    }

    // Premium shipping flows down from the root
    handle.dispatch("", SET_PREMIUM, &json!(true))?;
    if let Some(tab) = handle.snapshot().find("product/details-tab") {
        println!("shipping: {}", tab.slots["shipping"]);
    }

    println!("\n{}", serde_json::to_string_pretty(&handle.snapshot())?);

    handle.unmount();
    Ok(())
}
