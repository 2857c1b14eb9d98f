//! CLI command implementations.

pub mod cart;
pub mod shell;

use askama::Template;
use storecart_storefront::Effect;
use storecart_storefront::feedback::{ADD_LABEL, ADDED_LABEL};
use storecart_storefront::view::CartSummaryTemplate;

/// Describe an effect as terminal output.
///
/// # Errors
///
/// Returns an error if a cart view fails to render.
pub fn describe(effect: &Effect) -> Result<String, askama::Error> {
    let text = match effect {
        Effect::MenuToggled { open: true } => "menu: open".to_string(),
        Effect::MenuToggled { open: false } => "menu: closed".to_string(),
        Effect::CartOpened(view) | Effect::CartRendered(view) => {
            CartSummaryTemplate { cart: view }.render()?
        }
        Effect::CartClosed => "cart: closed".to_string(),
        Effect::CountChanged(count) => format!("cart count: {count}"),
        Effect::PendingChanged { id, pending, total } => {
            format!("{id}: qty {pending}, Total: {total}")
        }
        Effect::Acknowledged { id, .. } => format!("{id}: {ADDED_LABEL}"),
        Effect::AckReverted { id } => format!("{id}: {ADD_LABEL}"),
        Effect::Ignored => "(this page has no control for that)".to_string(),
    };
    Ok(text)
}

/// Print every effect, one block per effect.
///
/// # Errors
///
/// Returns an error if a cart view fails to render.
#[allow(clippy::print_stdout)]
pub fn print_effects(effects: &[Effect]) -> Result<(), askama::Error> {
    for effect in effects {
        println!("{}", describe(effect)?.trim_end());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use storecart_core::{Price, ProductId};
    use storecart_storefront::CartView;

    #[test]
    fn test_describe_simple_effects() {
        let id = ProductId::parse("A").unwrap();
        assert_eq!(describe(&Effect::CountChanged(4)).unwrap(), "cart count: 4");
        assert_eq!(
            describe(&Effect::PendingChanged {
                id: id.clone(),
                pending: 2,
                total: Price::from_units(2500),
            })
            .unwrap(),
            "A: qty 2, Total: ₹2,500"
        );
        assert_eq!(
            describe(&Effect::AckReverted { id }).unwrap(),
            "A: Add to Cart"
        );
    }

    #[test]
    fn test_describe_cart_view() {
        let text = describe(&Effect::CartOpened(CartView::empty())).unwrap();
        assert!(text.contains("Your cart is empty."));
        assert!(text.contains("Total: ₹0"));
    }
}
