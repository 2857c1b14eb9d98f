//! Cart line item.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Price, ProductId, Quantity};

/// One product entry in the cart.
///
/// The serialized field names (`id`, `name`, `price`, `quantity`) are the
/// persisted storage layout and must not change.
///
/// `quantity` is a plain `u32` rather than a [`Quantity`]: every single add
/// is clamped, but merging repeated adds of the same product may carry the
/// line past [`Quantity::MAX`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Display name captured when the product was first added.
    pub name: String,
    /// Unit price captured when the product was first added.
    pub price: Price,
    /// Units of this product in the cart, at least one.
    #[serde(deserialize_with = "deserialize_positive")]
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item for a first add of a product.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price, quantity: Quantity) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity: quantity.get(),
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }

    /// Add more units of the same product.
    ///
    /// With `cap` set the result stops at [`Quantity::MAX`], otherwise the sum
    /// is kept as is (saturating only at `u32::MAX`).
    pub fn merge_quantity(&mut self, more: Quantity, cap: bool) {
        let sum = self.quantity.saturating_add(more.get());
        self.quantity = if cap {
            sum.min(Quantity::MAX.get())
        } else {
            sum
        };
    }
}

fn deserialize_positive<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = u32::deserialize(deserializer)?;
    if value == 0 {
        return Err(serde::de::Error::custom("quantity must be at least 1"));
    }
    Ok(value)
}
