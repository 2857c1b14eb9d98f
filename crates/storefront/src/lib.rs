//! storecart Storefront - Cart widget engine.
//!
//! # Architecture
//!
//! - [`store`] - Key-value storage backends and the cart persistence adapter
//! - [`cart`] - Cart state manager (add, clear, totals)
//! - [`product`] - Per-product quantity controls
//! - [`feedback`] - "Added" acknowledgment deadlines
//! - [`view`] - Cart projections and askama templates
//! - [`catalog`] - Page layout and product cards
//! - [`widget`] - The composed widget and its action dispatch table
//! - [`config`] - Environment configuration
//!
//! Everything here is synchronous and single-threaded. State lives in an
//! owned [`Storefront`] value; front-ends feed it [`Action`]s and render the
//! [`Effect`]s it returns.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feedback;
pub mod product;
pub mod store;
pub mod view;
pub mod widget;

pub use cart::{CLEAR_CART_PROMPT, CartState, Confirm, MergePolicy};
pub use catalog::{Catalog, PageLayout};
pub use config::{LogFormat, StorecartConfig};
pub use error::{Result, StorefrontError};
pub use store::{CartStorage, FileStore, KeyValueStore, MemoryStore};
pub use view::CartView;
pub use widget::{Action, Effect, ProductCard, Storefront};

use tracing::info;

/// Mount a file-backed widget as described by `config`.
///
/// A missing catalog file yields a page without product cards; a catalog
/// that exists but cannot be parsed is an error.
///
/// # Errors
///
/// Returns [`StorefrontError::Catalog`] if the catalog cannot be read or parsed.
pub fn open(config: &StorecartConfig) -> Result<Storefront<FileStore>> {
    let catalog = if config.catalog_path.exists() {
        Catalog::load(&config.catalog_path)?
    } else {
        info!(path = %config.catalog_path.display(), "No catalog file, page has no product cards");
        Catalog::default()
    };

    let storage = CartStorage::new(FileStore::new(config.data_dir.clone()), config.storage_key.clone());
    let cart = CartState::load(storage, config.merge_policy);
    info!(
        dir = %cart.storage().store().dir().display(),
        key = cart.storage().key(),
        policy = ?cart.policy(),
        items = cart.len(),
        "Cart loaded"
    );

    Ok(Storefront::new(cart, &catalog, config.ack_delay))
}
