//! End-to-end tests: a mounted tree driven only through interactions and
//! observed only through snapshots.

use proptest::prelude::*;
use serde_json::{Value, json};
use spark_storefront::{
    ADD_TO_CART, CLICK, DispatchError, EventChannel, HOVER, INPUT, MountHandle, ProductSeed,
    REMOVE_FROM_CART, REVIEW_SUBMITTED, SELECT, SET_PREMIUM, SUBMIT, SelectionError, Snapshot,
    StoreConfig, Variant, mount, mount_with_channel,
};

const PRODUCT: &str = "product";
const DETAILS_TAB: &str = "product/details-tab";
const TABS: &str = "product/product-tabs";
const FORM: &str = "product/product-tabs/review-form";

fn two_variant_config() -> StoreConfig {
    StoreConfig {
        premium: false,
        product: ProductSeed {
            variants: vec![
                Variant::new(1, "green", "green.jpeg", 10),
                Variant::new(2, "blue", "blue.jpeg", 0),
            ],
            ..ProductSeed::default()
        },
    }
}

fn setup() -> MountHandle {
    mount(&two_variant_config()).unwrap()
}

fn node<'a>(snapshot: &'a Snapshot, path: &str) -> &'a Snapshot {
    snapshot.find(path).unwrap()
}

fn submit_review(handle: &mut MountHandle, name: &str, body: &str, rating: Value) {
    for (field, value) in [("name", json!(name)), ("body", json!(body)), ("rating", rating)] {
        handle
            .dispatch(FORM, INPUT, &json!({ "field": field, "value": value }))
            .unwrap();
    }
    handle.dispatch(FORM, SUBMIT, &json!(null)).unwrap();
}

// =============================================================================
// Variant selection
// =============================================================================

#[test]
fn test_select_reflects_variant_fields() {
    let mut handle = setup();

    for (index, image, in_stock) in [(1, "blue.jpeg", false), (0, "green.jpeg", true)] {
        handle.dispatch(PRODUCT, SELECT, &json!(index)).unwrap();
        let snapshot = handle.snapshot();
        let product = node(&snapshot, PRODUCT);
        assert_eq!(product.computed["image"], json!(image));
        assert_eq!(product.computed["in_stock"], json!(in_stock));
        assert_eq!(node(&snapshot, DETAILS_TAB).slots["in_stock"], json!(in_stock));
    }
}

#[test]
fn test_out_of_range_select_leaves_state() {
    let mut handle = setup();
    handle.dispatch(PRODUCT, SELECT, &json!(1)).unwrap();
    let before = handle.snapshot();

    let err = handle.dispatch(PRODUCT, SELECT, &json!(5)).unwrap_err();
    assert_eq!(err, DispatchError::Rejected(SelectionError { index: 5, len: 2 }));
    assert_eq!(handle.snapshot(), before);
}

#[test]
fn test_hover_color_box_selects_through_event() {
    let mut handle = setup();
    handle.dispatch(DETAILS_TAB, HOVER, &json!(1)).unwrap();

    let snapshot = handle.snapshot();
    assert_eq!(node(&snapshot, PRODUCT).computed["image"], json!("blue.jpeg"));
    assert_eq!(node(&snapshot, DETAILS_TAB).computed["stock_label"], json!("Out of Stock"));
}

// =============================================================================
// Cart
// =============================================================================

#[test]
fn test_out_of_stock_does_not_gate_cart() {
    let mut handle = setup();
    handle.dispatch(PRODUCT, SELECT, &json!(1)).unwrap();
    assert_eq!(node(&handle.snapshot(), PRODUCT).computed["in_stock"], json!(false));

    handle.dispatch(PRODUCT, ADD_TO_CART, &json!(null)).unwrap();
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.state["cart"], json!([2]));
    assert_eq!(snapshot.state["cart_size"], json!(1));
}

#[test]
fn test_remove_on_empty_or_absent_is_noop() {
    let mut handle = setup();

    handle.dispatch(PRODUCT, REMOVE_FROM_CART, &json!(null)).unwrap();
    assert_eq!(handle.snapshot().state["cart"], json!([]));

    handle.dispatch(PRODUCT, ADD_TO_CART, &json!(null)).unwrap();
    handle.dispatch(PRODUCT, SELECT, &json!(1)).unwrap();
    handle.dispatch(PRODUCT, REMOVE_FROM_CART, &json!(null)).unwrap();
    assert_eq!(handle.snapshot().state["cart"], json!([1]));
}

#[test]
fn test_remove_takes_first_match_only() {
    let mut handle = setup();
    handle.dispatch(PRODUCT, ADD_TO_CART, &json!(null)).unwrap();
    handle.dispatch(PRODUCT, SELECT, &json!(1)).unwrap();
    handle.dispatch(PRODUCT, ADD_TO_CART, &json!(null)).unwrap();
    handle.dispatch(PRODUCT, SELECT, &json!(0)).unwrap();
    handle.dispatch(PRODUCT, ADD_TO_CART, &json!(null)).unwrap();

    handle.dispatch(PRODUCT, REMOVE_FROM_CART, &json!(null)).unwrap();
    assert_eq!(handle.snapshot().state["cart"], json!([2, 1]));
}

// =============================================================================
// Premium shipping
// =============================================================================

#[test]
fn test_premium_flows_down_to_details_tab() {
    let mut handle = setup();
    assert_eq!(node(&handle.snapshot(), DETAILS_TAB).slots["shipping"], json!("2.99"));

    handle.dispatch("", SET_PREMIUM, &json!(true)).unwrap();
    let snapshot = handle.snapshot();
    assert_eq!(node(&snapshot, PRODUCT).computed["shipping"], json!("Free"));
    assert_eq!(node(&snapshot, DETAILS_TAB).slots["shipping"], json!("Free"));
}

#[test]
fn test_premium_seed() {
    let config = StoreConfig {
        premium: true,
        ..two_variant_config()
    };
    let mut handle = mount(&config).unwrap();
    assert_eq!(node(&handle.snapshot(), PRODUCT).computed["shipping"], json!("Free"));
}

// =============================================================================
// Reviews
// =============================================================================

#[test]
fn test_review_reaches_tabs() {
    let mut handle = setup();
    assert_eq!(
        node(&handle.snapshot(), TABS).computed["empty_message"],
        json!("There are no reviews yet")
    );

    submit_review(&mut handle, "Ada", "Warm and soft", json!(5));

    let snapshot = handle.snapshot();
    let tabs = node(&snapshot, TABS);
    assert_eq!(
        tabs.slots["reviews"],
        json!([{ "name": "Ada", "body": "Warm and soft", "rating": 5 }])
    );
    assert_eq!(tabs.computed["has_reviews"], json!(true));
    assert_eq!(tabs.computed["empty_message"], json!(null));

    let form = node(&snapshot, FORM);
    assert_eq!(form.state["name"], json!(""));
    assert_eq!(form.state["body"], json!(""));
    assert_eq!(form.state["rating"], json!(null));
}

#[test]
fn test_invalid_review_reports_errors_in_order() {
    let mut handle = setup();
    submit_review(&mut handle, "", "Warm", json!(9));

    let snapshot = handle.snapshot();
    assert_eq!(
        node(&snapshot, FORM).state["errors"],
        json!(["Name required", "Rating must be between 1 and 5"])
    );
    assert_eq!(node(&snapshot, TABS).computed["review_count"], json!(0));
}

#[test]
fn test_reviews_arrive_in_submission_order() {
    let mut handle = setup();
    submit_review(&mut handle, "Ada", "First", json!(4));
    submit_review(&mut handle, "Grace", "Second", json!("2"));

    let snapshot = handle.snapshot();
    let names: Vec<_> = node(&snapshot, TABS).slots["reviews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Ada"), json!("Grace")]);
}

#[test]
fn test_tab_clicks() {
    let mut handle = setup();
    handle.dispatch(TABS, CLICK, &json!("Make a review")).unwrap();
    handle.dispatch(DETAILS_TAB, CLICK, &json!("Details")).unwrap();

    let snapshot = handle.snapshot();
    assert_eq!(node(&snapshot, TABS).computed["show_form"], json!(true));
    assert_eq!(node(&snapshot, DETAILS_TAB).computed["show_details"], json!(true));
}

// =============================================================================
// Channel and lifecycle
// =============================================================================

#[test]
fn test_failing_subscriber_does_not_block_product() {
    let channel = EventChannel::new();
    channel.subscribe(REVIEW_SUBMITTED, |_| anyhow::bail!("audit log offline"));
    channel.subscribe(REVIEW_SUBMITTED, |_| panic!("analytics crashed"));

    let mut handle = mount_with_channel(&two_variant_config(), channel).unwrap();
    submit_review(&mut handle, "Ada", "Warm", json!(3));

    assert_eq!(handle.failures().len(), 2);
    assert_eq!(node(&handle.snapshot(), TABS).computed["review_count"], json!(1));
}

#[test]
fn test_channel_publish_reaches_tabs_in_order() {
    let mut handle = setup();
    let first = json!({ "name": "Ada", "body": "First", "rating": 4 });
    let second = json!({ "name": "Grace", "body": "Second", "rating": 2 });

    handle.channel().publish(REVIEW_SUBMITTED, &first);
    handle.channel().publish(REVIEW_SUBMITTED, &second);

    let snapshot = handle.snapshot();
    let stored = &node(&snapshot, PRODUCT).state["reviews"];
    let shown = &node(&snapshot, TABS).slots["reviews"];
    assert_eq!(*stored, json!([first, second]));
    assert_eq!(shown, stored);
    assert_eq!(node(&snapshot, TABS).computed["review_count"], json!(2));
}

#[test]
fn test_unmount_stops_review_delivery() {
    let channel = EventChannel::new();
    let handle = mount_with_channel(&two_variant_config(), channel.clone()).unwrap();
    assert_eq!(channel.subscriber_count(REVIEW_SUBMITTED), 1);

    handle.unmount();
    let delivered = channel.publish(
        REVIEW_SUBMITTED,
        &json!({ "name": "Ada", "body": "Late", "rating": 5 }),
    );
    assert_eq!(delivered, 0);
    assert!(channel.failures().is_empty());
}

#[test]
fn test_default_config_mounts_socks() {
    let mut handle = mount(&StoreConfig::default()).unwrap();
    let snapshot = handle.snapshot();
    let product = node(&snapshot, PRODUCT);
    assert_eq!(product.computed["title"], json!("Vue Mastery Socks"));
    assert_eq!(
        product.computed["image"],
        json!("./assets/images/vmSocks-green-onWhite.jpeg")
    );
    assert_eq!(
        node(&snapshot, "product/details-tab/product-details").computed["detail_count"],
        json!(3)
    );
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_reviews_fifo(bodies in prop::collection::vec("[a-z]{1,12}", 1..6)) {
        let mut handle = setup();
        for (i, body) in bodies.iter().enumerate() {
            submit_review(&mut handle, &format!("user{i}"), body, json!(1 + i % 5));
        }

        let snapshot = handle.snapshot();
        let stored: Vec<_> = node(&snapshot, TABS).slots["reviews"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["body"].as_str().unwrap().to_string())
            .collect();
        prop_assert_eq!(stored, bodies);
    }

    #[test]
    fn prop_select_in_range_matches_variant(index in 0usize..2) {
        let mut handle = setup();
        handle.dispatch(PRODUCT, SELECT, &json!(index)).unwrap();

        let config = two_variant_config();
        let expected = &config.product.variants[index];
        let snapshot = handle.snapshot();
        let product = node(&snapshot, PRODUCT);
        prop_assert_eq!(&product.computed["image"], &json!(expected.image));
        prop_assert_eq!(&product.computed["in_stock"], &json!(expected.in_stock()));
    }
}
