//! Cart state manager.
//!
//! [`CartState`] owns the line items and the storage they persist to. It is
//! an ordinary value held by whoever composes the widget and passed to
//! handlers by reference; there is no global cart.

use std::str::FromStr;

use storecart_core::{LineItem, Price, ProductId, Quantity};
use tracing::{debug, instrument};

use crate::store::{CartStorage, KeyValueStore};

/// Prompt shown before the cart is emptied.
pub const CLEAR_CART_PROMPT: &str = "Are you sure you want to clear the entire cart?";

/// A blocking yes/no question put to the shopper.
pub trait Confirm {
    /// Ask `message` and wait for the answer.
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// How repeated adds of the same product combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Add the new quantity to the line as is. The line may exceed
    /// [`Quantity::MAX`].
    #[default]
    Accumulate,
    /// Add the new quantity but stop the line at [`Quantity::MAX`].
    Saturate,
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accumulate" => Ok(Self::Accumulate),
            "saturate" => Ok(Self::Saturate),
            other => Err(format!(
                "unknown merge policy '{other}' (expected 'accumulate' or 'saturate')"
            )),
        }
    }
}

/// The shopper's cart: ordered line items, at most one per product.
#[derive(Debug)]
pub struct CartState<S> {
    items: Vec<LineItem>,
    storage: CartStorage<S>,
    policy: MergePolicy,
}

impl<S: KeyValueStore> CartState<S> {
    /// Load the cart from `storage`.
    ///
    /// A missing or malformed stored cart yields an empty cart.
    pub fn load(storage: CartStorage<S>, policy: MergePolicy) -> Self {
        let items = storage.load();
        debug!(lines = items.len(), "Cart loaded");
        Self {
            items,
            storage,
            policy,
        }
    }

    /// Line items in the order their products were first added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line for `id`, if the product is in the cart.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|line| &line.id == id)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The merge policy in effect.
    #[must_use]
    pub const fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// The persistence adapter.
    pub const fn storage(&self) -> &CartStorage<S> {
        &self.storage
    }

    /// Add `requested` units of a product and persist.
    ///
    /// The requested quantity is clamped to `[1, 999]` first. An existing
    /// line for `id` grows by that amount and keeps its original name and
    /// price; otherwise a new line is appended.
    #[allow(clippy::indexing_slicing)] // index was either found or just pushed
    #[instrument(skip(self, name, price), fields(id = %id))]
    pub fn add_item(
        &mut self,
        id: ProductId,
        name: &str,
        price: Price,
        requested: i64,
    ) -> &LineItem {
        let quantity = Quantity::clamp(requested);
        let cap = self.policy == MergePolicy::Saturate;

        let index = match self.items.iter().position(|line| line.id == id) {
            Some(index) => {
                if let Some(line) = self.items.get_mut(index) {
                    line.merge_quantity(quantity, cap);
                }
                index
            }
            None => {
                self.items.push(LineItem::new(id, name, price, quantity));
                self.items.len() - 1
            }
        };

        self.storage.save(&self.items);
        debug!(total_count = self.total_count(), "Item added to cart");

        &self.items[index]
    }

    /// Empty the cart after the shopper confirms.
    ///
    /// Returns `true` if the cart was cleared. When the shopper declines,
    /// nothing changes and nothing is written.
    #[instrument(skip_all)]
    pub fn clear(&mut self, confirm: &mut impl Confirm) -> bool {
        if !confirm.confirm(CLEAR_CART_PROMPT) {
            debug!("Cart clear declined");
            return false;
        }

        self.items.clear();
        self.storage.save(&self.items);
        debug!("Cart cleared");
        true
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of line totals across all lines.
    #[must_use]
    pub fn total_amount(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn empty_cart(policy: MergePolicy) -> CartState<MemoryStore> {
        CartState::load(CartStorage::with_default_key(MemoryStore::new()), policy)
    }

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    #[test]
    fn test_add_new_item() {
        let mut cart = empty_cart(MergePolicy::Accumulate);
        cart.add_item(id("A"), "Mango", Price::from_units(100), 3);

        assert_eq!(cart.total_count(), 3);
        assert_eq!(cart.total_amount(), Price::from_units(300));
        assert_eq!(cart.storage().store().writes(), 1);
    }

    #[test]
    fn test_add_same_item_merges() {
        let mut cart = empty_cart(MergePolicy::Accumulate);
        cart.add_item(id("A"), "Mango", Price::from_units(100), 3);
        let line = cart.add_item(id("A"), "Renamed", Price::from_units(1), 5);

        assert_eq!(line.quantity, 8);
        assert_eq!(line.name, "Mango");
        assert_eq!(line.price, Price::from_units(100));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_clamps_requested_quantity() {
        let mut cart = empty_cart(MergePolicy::Accumulate);
        assert_eq!(cart.add_item(id("A"), "A", Price::ZERO, 0).quantity, 1);
        assert_eq!(cart.add_item(id("B"), "B", Price::ZERO, 5000).quantity, 999);
    }

    #[test]
    fn test_accumulate_exceeds_max() {
        let mut cart = empty_cart(MergePolicy::Accumulate);
        cart.add_item(id("A"), "A", Price::ZERO, 600);
        assert_eq!(cart.add_item(id("A"), "A", Price::ZERO, 600).quantity, 1200);
    }

    #[test]
    fn test_saturate_caps_merge() {
        let mut cart = empty_cart(MergePolicy::Saturate);
        cart.add_item(id("A"), "A", Price::ZERO, 600);
        assert_eq!(cart.add_item(id("A"), "A", Price::ZERO, 600).quantity, 999);
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut cart = empty_cart(MergePolicy::Accumulate);
        cart.add_item(id("B"), "B", Price::ZERO, 1);
        cart.add_item(id("A"), "A", Price::ZERO, 1);
        cart.add_item(id("B"), "B", Price::ZERO, 1);

        let ids: Vec<&str> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
    }

    #[test]
    fn test_clear_confirmed() {
        let mut cart = empty_cart(MergePolicy::Accumulate);
        cart.add_item(id("A"), "A", Price::from_units(10), 2);

        let mut asked = None;
        let cleared = cart.clear(&mut |msg: &str| {
            asked = Some(msg.to_owned());
            true
        });

        assert!(cleared);
        assert!(cart.is_empty());
        assert_eq!(cart.total_count(), 0);
        assert_eq!(asked.as_deref(), Some(CLEAR_CART_PROMPT));
        assert_eq!(cart.storage().store().writes(), 2);
        assert_eq!(cart.storage().store().raw("cart"), Some("[]"));
    }

    #[test]
    fn test_clear_declined_writes_nothing() {
        let mut cart = empty_cart(MergePolicy::Accumulate);
        cart.add_item(id("A"), "A", Price::from_units(10), 2);
        let before = cart.items().to_vec();

        assert!(!cart.clear(&mut |_: &str| false));
        assert_eq!(cart.items(), before.as_slice());
        assert_eq!(cart.storage().store().writes(), 1);
    }

    #[test]
    fn test_load_existing_cart() {
        let raw = r#"[{"id":"A","name":"Mango","price":100,"quantity":3}]"#;
        let storage = CartStorage::with_default_key(MemoryStore::with_item("cart", raw));
        let cart = CartState::load(storage, MergePolicy::default());

        assert_eq!(cart.total_count(), 3);
        assert!(cart.get(&id("A")).is_some());
        assert!(cart.get(&id("B")).is_none());
    }

    #[test]
    fn test_merge_policy_from_str() {
        assert_eq!("Saturate".parse(), Ok(MergePolicy::Saturate));
        assert_eq!(" accumulate ".parse(), Ok(MergePolicy::Accumulate));
        assert!("cap".parse::<MergePolicy>().is_err());
    }
}
