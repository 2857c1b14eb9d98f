//! Per-product quantity controls.
//!
//! Each product card carries a pending quantity that the shopper adjusts with
//! minus/plus buttons or by typing, and a derived pending total. The pending
//! value is clamped again at every trigger point, so no input path can hand
//! the cart an out-of-range quantity.

use storecart_core::{Price, ProductId, Quantity};

/// Name used for a product card that does not declare one.
pub const DEFAULT_PRODUCT_NAME: &str = "Product";

/// The product a card sells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
}

impl Product {
    #[must_use]
    pub fn new(id: ProductId, name: Option<String>, price: Price) -> Self {
        Self {
            id,
            name: name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_owned()),
            price,
        }
    }
}

/// Pending quantity state for one product card.
///
/// Typed input is kept as entered (digits only) until [`finalize`] runs, so
/// a shopper typing `1500` sees `1500` until the field loses focus. Every
/// other operation works on the clamped value.
///
/// [`finalize`]: ProductControl::finalize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductControl {
    unit_price: Price,
    pending: u32,
}

impl ProductControl {
    /// A control at the default pending quantity of one.
    #[must_use]
    pub fn new(unit_price: Price) -> Self {
        Self {
            unit_price,
            pending: Quantity::MIN.get(),
        }
    }

    /// The raw pending value, possibly above [`Quantity::MAX`] after typing.
    #[must_use]
    pub const fn pending(&self) -> u32 {
        self.pending
    }

    /// The pending value clamped to the allowed range.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        Quantity::clamp(i64::from(self.pending))
    }

    /// Unit price times the clamped pending quantity.
    #[must_use]
    pub fn pending_total(&self) -> Price {
        self.unit_price * self.quantity().get()
    }

    /// Plus button: one more, up to the maximum.
    pub fn increment(&mut self) -> Quantity {
        self.settle(self.quantity().increment())
    }

    /// Minus button: one less, down to the minimum.
    pub fn decrement(&mut self) -> Quantity {
        self.settle(self.quantity().decrement())
    }

    /// Direct entry: keep only the digits of `text`.
    ///
    /// Empty input and zero become one. Values above the maximum are kept
    /// until [`ProductControl::finalize`].
    pub fn set_raw(&mut self, text: &str) -> u32 {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        self.pending = if digits.is_empty() {
            Quantity::MIN.get()
        } else {
            // Only overflow can fail here; treat it as "very large".
            digits.parse::<u32>().unwrap_or(u32::MAX).max(Quantity::MIN.get())
        };
        self.pending
    }

    /// Field lost focus: clamp the pending value.
    pub fn finalize(&mut self) -> Quantity {
        self.settle(self.quantity())
    }

    /// Clamp, hand back the quantity to add, and reset to one.
    pub fn take_for_add(&mut self) -> Quantity {
        let quantity = self.quantity();
        self.pending = Quantity::MIN.get();
        quantity
    }

    fn settle(&mut self, quantity: Quantity) -> Quantity {
        self.pending = quantity.get();
        quantity
    }
}
