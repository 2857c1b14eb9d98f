//! One-shot cart commands.
//!
//! Each command mounts the widget, dispatches the same actions a shopper's
//! clicks would, prints the resulting effects, and exits. The cart persists
//! between invocations through the file store.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use askama::Template;
use storecart_core::ProductId;
use storecart_storefront::view::{
    CartCountTemplate, CartItemsTemplate, CartSummaryTemplate, ProductTotalTemplate,
};
use storecart_storefront::{Action, Effect, FileStore, Storefront};
use tracing::{info, warn};

use super::print_effects;

/// List the page's product cards.
///
/// # Errors
///
/// Returns an error if a fragment fails to render.
#[allow(clippy::print_stdout)]
pub fn products(storefront: &Storefront<FileStore>, html: bool) -> Result<(), askama::Error> {
    if storefront.cards().is_empty() {
        println!("No product cards on this page.");
        return Ok(());
    }

    for card in storefront.cards() {
        let total = card.control.pending_total().to_string();
        if html {
            println!(
                "<!-- {} -->\n{}",
                card.product.id,
                ProductTotalTemplate { total }.render()?
            );
        } else {
            println!(
                "{:<16} {:<32} {:>12}  [{}]",
                card.product.id.as_str(),
                card.product.name,
                card.product.price.to_string(),
                card.ack.label()
            );
        }
    }
    Ok(())
}

/// Add a product through its card: type the quantity, blur, click add.
///
/// # Errors
///
/// Returns an error if the id is invalid or output fails to render.
pub fn add(
    storefront: &mut Storefront<FileStore>,
    id: &str,
    qty: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::parse(id)?;
    let mut never = |_: &str| false;

    let mut actions = Vec::new();
    if let Some(text) = qty {
        actions.push(Action::SetQuantity(id.clone(), text.to_owned()));
        actions.push(Action::FinalizeQuantity(id.clone()));
    }
    actions.push(Action::AddToCart(id.clone()));

    let mut effects = Vec::new();
    for action in actions {
        effects = storefront.dispatch(action, &mut never, Instant::now());
    }

    if effects.contains(&Effect::Ignored) {
        warn!(%id, "No product card with this id on the page");
        return Ok(());
    }

    info!(%id, total_count = storefront.cart().total_count(), "Added to cart");
    print_effects(&effects)?;
    Ok(())
}

/// Render the cart view.
///
/// # Errors
///
/// Returns an error if a template fails to render.
#[allow(clippy::print_stdout)]
pub fn show(storefront: &Storefront<FileStore>, html: bool) -> Result<(), askama::Error> {
    let view = storefront.cart_view();
    if html {
        println!("{}", CartItemsTemplate { cart: &view }.render()?);
        if let Some(count) = storefront.count_badge() {
            println!("{}", CartCountTemplate { count }.render()?);
        }
    } else {
        print!("{}", CartSummaryTemplate { cart: &view }.render()?);
    }
    Ok(())
}

/// Print the cart count.
#[allow(clippy::print_stdout)]
pub fn count(storefront: &Storefront<FileStore>) {
    println!("{}", storefront.cart().total_count());
}

/// Clear the cart, asking on stdin unless `yes` is set.
///
/// # Errors
///
/// Returns an error if output fails to render.
#[allow(clippy::print_stdout)]
pub fn clear(
    storefront: &mut Storefront<FileStore>,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut confirm = |message: &str| yes || prompt_yes_no(message);
    let effects = storefront.dispatch(Action::ClearCart, &mut confirm, Instant::now());

    if effects.is_empty() {
        println!("Cart left unchanged.");
        return Ok(());
    }
    print_effects(&effects)?;
    Ok(())
}

/// Ask a yes/no question on stdout and block for the answer on stdin.
///
/// Anything other than `y` or `yes` (including a read failure) is a no.
#[allow(clippy::print_stdout)]
pub fn prompt_yes_no(message: &str) -> bool {
    print!("{message} [y/N] ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(e) => {
            warn!(error = %e, "Failed to read confirmation");
            false
        }
    }
}

/// Whether an answer line means yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
