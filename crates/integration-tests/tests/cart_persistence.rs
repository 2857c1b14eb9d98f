//! Integration tests for cart persistence through the file store.
//!
//! Each test mounts widgets over a temporary directory, the way separate
//! page loads share one browser's storage.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;
use std::time::Instant;

use serde_json::{Value, json};
use storecart_integration_tests::{CATALOG, add, file_storefront, mount, pid};
use storecart_storefront::{Action, CartStorage, FileStore, KeyValueStore, MergePolicy};
use tempfile::TempDir;

fn stored_json(dir: &TempDir) -> Value {
    let raw = fs::read_to_string(dir.path().join("cart.json")).expect("cart file exists");
    serde_json::from_str(&raw).expect("cart file is JSON")
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_cart_survives_remount() {
    let dir = TempDir::new().unwrap();

    {
        let mut storefront = file_storefront(dir.path());
        add(&mut storefront, "A", 3);
        add(&mut storefront, "B", 2);
    }

    let storefront = file_storefront(dir.path());
    let items = storefront.cart().items();
    assert_eq!(items.len(), 2);
    assert_eq!(storefront.cart().get(&pid("A")).unwrap().quantity, 3);
    assert_eq!(storefront.cart().get(&pid("B")).unwrap().quantity, 2);
    assert_eq!(storefront.cart().total_count(), 5);
    assert_eq!(storefront.cart().total_amount().to_string(), "₹399");
}

#[test]
fn test_persisted_layout() {
    let dir = TempDir::new().unwrap();
    let mut storefront = file_storefront(dir.path());
    add(&mut storefront, "A", 3);

    assert_eq!(
        stored_json(&dir),
        json!([{"id": "A", "name": "Alphonso Mango", "price": 100, "quantity": 3}])
    );
}

#[test]
fn test_save_load_is_stable() {
    let dir = TempDir::new().unwrap();
    {
        let mut storefront = file_storefront(dir.path());
        add(&mut storefront, "B", 4);
        add(&mut storefront, "A", 1);
    }
    let first = fs::read_to_string(dir.path().join("cart.json")).unwrap();

    let mut storage = CartStorage::with_default_key(FileStore::new(dir.path()));
    for _ in 0..2 {
        let items = storage.load();
        storage.save(&items);
    }
    let second = fs::read_to_string(dir.path().join("cart.json")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_foreign_cart_is_saved_back_unchanged() {
    let dir = TempDir::new().unwrap();
    let written = r#"[{"id":"A","name":"Alphonso Mango","price":100,"quantity":2},{"id":"B","name":"Banganapalli","price":49.5,"quantity":1}]"#;
    fs::write(dir.path().join("cart.json"), written).unwrap();

    let mut storage = CartStorage::with_default_key(FileStore::new(dir.path()));
    let items = storage.load();
    storage.save(&items);

    assert_eq!(fs::read_to_string(dir.path().join("cart.json")).unwrap(), written);
}

#[test]
fn test_cleared_cart_persists_empty() {
    let dir = TempDir::new().unwrap();
    {
        let mut storefront = file_storefront(dir.path());
        add(&mut storefront, "A", 2);
        let effects =
            storefront.dispatch(Action::ClearCart, &mut |_: &str| true, Instant::now());
        assert!(!effects.is_empty());
    }

    assert_eq!(stored_json(&dir), json!([]));
    assert!(file_storefront(dir.path()).cart().is_empty());
}

// ============================================================================
// Malformed storage
// ============================================================================

#[test]
fn test_corrupt_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cart.json"), "{not json").unwrap();

    let mut storefront = file_storefront(dir.path());
    assert!(storefront.cart().is_empty());
    assert_eq!(storefront.count_badge(), Some(0));

    // The next add overwrites the corrupt value
    add(&mut storefront, "A", 1);
    assert_eq!(stored_json(&dir)[0]["quantity"], 1);
}

#[test]
fn test_wrong_shape_loads_empty() {
    for raw in [
        r#"{"id":"A"}"#,
        r#"[{"id":"A","name":"x","price":-1,"quantity":1}]"#,
        r#"[{"id":"A","name":"x","price":1,"quantity":0}]"#,
        r#"[{"id":"","name":"x","price":1,"quantity":1}]"#,
    ] {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cart.json"), raw).unwrap();
        assert!(
            file_storefront(dir.path()).cart().is_empty(),
            "expected empty cart for {raw}"
        );
    }
}

#[test]
fn test_null_loads_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cart.json"), "null").unwrap();
    assert!(file_storefront(dir.path()).cart().is_empty());
}

#[test]
fn test_duplicate_lines_merge_on_load() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("cart.json"),
        r#"[
            {"id":"A","name":"First","price":100,"quantity":2},
            {"id":"B","name":"Other","price":5,"quantity":1},
            {"id":"A","name":"Second","price":1,"quantity":4}
        ]"#,
    )
    .unwrap();

    let storefront = file_storefront(dir.path());
    let items = storefront.cart().items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "First");
    assert_eq!(items[0].quantity, 6);
    assert_eq!(storefront.cart().total_count(), 7);
}

// ============================================================================
// Storage keys and policies
// ============================================================================

#[test]
fn test_separate_directories_are_separate_carts() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    add(&mut file_storefront(first.path()), "A", 2);

    assert_eq!(file_storefront(first.path()).cart().total_count(), 2);
    assert!(file_storefront(second.path()).cart().is_empty());
}

#[test]
fn test_invalid_storage_key_fails_open() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());
    assert!(store.get_item("../escape").is_err());

    let mut storage = CartStorage::new(store, "../escape");
    assert!(storage.load().is_empty());
    storage.save(&[]);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_saturate_policy_caps_persisted_quantity() {
    let dir = TempDir::new().unwrap();
    let mut storefront = mount(
        FileStore::new(dir.path()),
        CATALOG,
        MergePolicy::Saturate,
    );

    add(&mut storefront, "A", 900);
    add(&mut storefront, "A", 900);

    assert_eq!(stored_json(&dir)[0]["quantity"], 999);
    assert_eq!(storefront.cart().total_count(), 999);
}
