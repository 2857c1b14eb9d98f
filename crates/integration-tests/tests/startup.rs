//! Integration tests for mounting the widget from configuration.
//!
//! These go through `storecart_storefront::open`, the same entry point the
//! CLI uses, so every configured value has to reach the mounted widget.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use serde_json::Value;
use storecart_integration_tests::{CATALOG, add, pid};
use storecart_storefront::catalog::CatalogError;
use storecart_storefront::{Action, Effect, MergePolicy, StorecartConfig, StorefrontError, open};
use tempfile::TempDir;

fn config_in(dir: &Path) -> StorecartConfig {
    StorecartConfig {
        data_dir: dir.join("data"),
        catalog_path: dir.join("catalog.yaml"),
        ..StorecartConfig::default()
    }
}

fn write_catalog(dir: &Path, yaml: &str) {
    fs::write(dir.join("catalog.yaml"), yaml).unwrap();
}

// ============================================================================
// Catalog file
// ============================================================================

#[test]
fn test_missing_catalog_mounts_empty_page() {
    let dir = TempDir::new().unwrap();
    let storefront = open(&config_in(dir.path())).unwrap();

    assert!(storefront.cards().is_empty());
    assert!(storefront.cart().is_empty());
    assert_eq!(storefront.count_badge(), Some(0));
}

#[test]
fn test_unparsable_catalog_is_an_error() {
    let dir = TempDir::new().unwrap();
    write_catalog(dir.path(), "products: {");

    let err = open(&config_in(dir.path())).unwrap_err();
    assert!(matches!(
        err,
        StorefrontError::Catalog(CatalogError::Parse(_))
    ));
}

#[test]
fn test_unreadable_catalog_is_an_error() {
    let dir = TempDir::new().unwrap();
    // A directory exists at the path but cannot be read as a file
    fs::create_dir(dir.path().join("catalog.yaml")).unwrap();

    let err = open(&config_in(dir.path())).unwrap_err();
    assert!(matches!(
        err,
        StorefrontError::Catalog(CatalogError::Read { .. })
    ));
}

#[test]
fn test_catalog_cards_are_mounted() {
    let dir = TempDir::new().unwrap();
    write_catalog(dir.path(), CATALOG);

    let storefront = open(&config_in(dir.path())).unwrap();
    let ids: Vec<&str> = storefront
        .cards()
        .iter()
        .map(|card| card.product.id.as_str())
        .collect();
    assert_eq!(ids, ["A", "B", "C"]);
}

// ============================================================================
// Configured values
// ============================================================================

#[test]
fn test_storage_key_and_merge_policy_reach_the_cart() {
    let dir = TempDir::new().unwrap();
    write_catalog(dir.path(), CATALOG);
    let config = StorecartConfig {
        storage_key: "shop".to_string(),
        merge_policy: MergePolicy::Saturate,
        ..config_in(dir.path())
    };

    let mut storefront = open(&config).unwrap();
    add(&mut storefront, "A", 900);
    add(&mut storefront, "A", 900);

    let data = dir.path().join("data");
    assert!(!data.join("cart.json").exists());
    let stored: Value =
        serde_json::from_str(&fs::read_to_string(data.join("shop.json")).unwrap()).unwrap();
    assert_eq!(stored[0]["quantity"], 999);

    // A second mount over the same config sees the same cart
    let reopened = open(&config).unwrap();
    assert_eq!(reopened.cart().get(&pid("A")).unwrap().quantity, 999);
}

#[test]
fn test_ack_delay_reaches_the_cards() {
    let dir = TempDir::new().unwrap();
    write_catalog(dir.path(), CATALOG);
    let config = StorecartConfig {
        ack_delay: Duration::from_millis(250),
        ..config_in(dir.path())
    };

    let mut storefront = open(&config).unwrap();
    let start = Instant::now();
    let effects = storefront.dispatch(Action::AddToCart(pid("A")), &mut |_: &str| false, start);

    assert!(matches!(
        &effects[0],
        Effect::Acknowledged { until, .. } if *until == start + Duration::from_millis(250)
    ));
}
