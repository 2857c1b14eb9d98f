//! Integration tests for storecart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storecart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `startup` - Mounting the widget from configuration
//! - `cart_persistence` - File store round trips across widget instances
//! - `storefront_scenarios` - Shopper flows driven through action dispatch
//!
//! Shared fixtures live here so every test mounts the same page.

use std::path::Path;
use std::time::{Duration, Instant};

use storecart_core::ProductId;
use storecart_storefront::{
    Action, CartState, CartStorage, Catalog, Effect, FileStore, KeyValueStore, MemoryStore,
    MergePolicy, Storefront,
};

/// Acknowledgment delay used by every fixture.
pub const ACK_DELAY: Duration = Duration::from_millis(1200);

/// A page with every control and three product cards.
pub const CATALOG: &str = r#"
products:
  - id: A
    name: Alphonso Mango
    base_price: 100
  - id: B
    name: Banganapalli
    base_price: "49.50"
  - id: C
    base_price: 1234567.5
"#;

/// A page with only product cards: no menu, cart link, modal or badge.
pub const BARE_CATALOG: &str = r"
page:
  menu: false
  cart_link: false
  cart_modal: false
  close_button: false
  count_badge: false
  clear_button: false
products:
  - id: A
    name: Alphonso Mango
    base_price: 100
";

/// Parse a product id.
///
/// # Panics
///
/// Panics if `id` is blank.
#[must_use]
pub fn pid(id: &str) -> ProductId {
    ProductId::parse(id).expect("fixture ids are valid")
}

/// Parse a fixture catalog.
///
/// # Panics
///
/// Panics if `yaml` is not a valid catalog.
#[must_use]
pub fn catalog(yaml: &str) -> Catalog {
    Catalog::from_yaml(yaml).expect("fixture catalog parses")
}

/// Mount a widget on `yaml` over an arbitrary store.
#[must_use]
pub fn mount<S: KeyValueStore>(store: S, yaml: &str, policy: MergePolicy) -> Storefront<S> {
    let cart = CartState::load(CartStorage::with_default_key(store), policy);
    Storefront::new(cart, &catalog(yaml), ACK_DELAY)
}

/// Mount the full page over an empty in-memory store.
#[must_use]
pub fn memory_storefront() -> Storefront<MemoryStore> {
    mount(MemoryStore::new(), CATALOG, MergePolicy::Accumulate)
}

/// Mount the full page over a file store rooted at `dir`.
#[must_use]
pub fn file_storefront(dir: &Path) -> Storefront<FileStore> {
    mount(FileStore::new(dir), CATALOG, MergePolicy::Accumulate)
}

/// Dispatch a parsed action identifier, declining any confirmation.
///
/// # Panics
///
/// Panics if `identifier` is not a valid action.
pub fn send<S: KeyValueStore>(storefront: &mut Storefront<S>, identifier: &str) -> Vec<Effect> {
    let action: Action = identifier.parse().expect("fixture action parses");
    storefront.dispatch(action, &mut |_: &str| false, Instant::now())
}

/// Type `qty` into a card, blur it, then add to cart.
pub fn add<S: KeyValueStore>(storefront: &mut Storefront<S>, id: &str, qty: u32) -> Vec<Effect> {
    send(storefront, &format!("qty-input {id} {qty}"));
    send(storefront, &format!("qty-blur {id}"));
    send(storefront, &format!("add-to-cart {id}"))
}
