//! Cart view rendering.
//!
//! [`CartView`] is a pure projection of the cart's line items: formatted
//! strings ready for a template, never mutated back into cart state. The
//! askama templates below turn views into page fragments.

use askama::Template;
use storecart_core::{LineItem, Price};

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRowView {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&LineItem> for CartRowView {
    fn from(line: &LineItem) -> Self {
        Self {
            name: line.name.clone(),
            quantity: line.quantity,
            line_total: line.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub rows: Vec<CartRowView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total: Price::ZERO.to_string(),
            item_count: 0,
        }
    }

    /// Project line items into rows plus a grand total.
    #[must_use]
    pub fn from_items(items: &[LineItem]) -> Self {
        let total: Price = items.iter().map(LineItem::line_total).sum();
        Self {
            rows: items.iter().map(CartRowView::from).collect(),
            total: total.to_string(),
            item_count: items.iter().map(|line| u64::from(line.quantity)).sum(),
        }
    }
}

/// Cart items fragment shown inside the cart modal.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate<'a> {
    pub cart: &'a CartView,
}

/// Cart count badge fragment.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Pending total shown on a product card.
#[derive(Template)]
#[template(path = "partials/product_total.html")]
pub struct ProductTotalTemplate {
    pub total: String,
}

/// Plain-text cart summary for terminals.
#[derive(Template)]
#[template(path = "cart/summary.txt")]
pub struct CartSummaryTemplate<'a> {
    pub cart: &'a CartView,
}
