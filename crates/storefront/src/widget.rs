//! The storefront widget and its action dispatch table.
//!
//! [`Storefront`] composes the cart with the page around it: navigation
//! menu, cart modal, count badge, clear control and one [`ProductCard`] per
//! catalog product. Presentation layers translate user events into
//! [`Action`]s, call [`Storefront::dispatch`], and apply the returned
//! [`Effect`]s. Actions aimed at controls the page does not have are
//! accepted and answered with [`Effect::Ignored`].
//!
//! Every [`Effect::Acknowledged`] carries a token; the front-end schedules a
//! timer for its `until` and passes the token to [`Storefront::revert_ack`].

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use storecart_core::{Price, ProductId, ProductIdError};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::cart::{CartState, Confirm};
use crate::catalog::{Catalog, PageLayout};
use crate::feedback::{AckToken, Acknowledgment};
use crate::product::{Product, ProductControl};
use crate::store::KeyValueStore;
use crate::view::CartView;

/// Errors that can occur when parsing an [`Action`] identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("unknown action '{0}'")]
    Unknown(String),
    #[error("action '{0}' needs a product id")]
    MissingProduct(&'static str),
    #[error("invalid product id: {0}")]
    InvalidProduct(#[from] ProductIdError),
}

/// A user interaction with the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hamburger button.
    ToggleMenu,
    /// Cart link in the header.
    OpenCart,
    /// Close control inside the cart modal.
    CloseCart,
    /// Click on the modal backdrop, outside its content.
    BackdropClick,
    /// Clear-cart control.
    ClearCart,
    /// Plus button on a product card.
    Increment(ProductId),
    /// Minus button on a product card.
    Decrement(ProductId),
    /// Typing into a product card's quantity field.
    SetQuantity(ProductId, String),
    /// A product card's quantity field losing focus.
    FinalizeQuantity(ProductId),
    /// Add-to-cart button on a product card.
    AddToCart(ProductId),
}

impl Action {
    /// Identifiers accepted by [`Action::from_str`], with their arguments.
    pub const IDENTIFIERS: [&'static str; 10] = [
        "toggle-menu",
        "open-cart",
        "close-cart",
        "backdrop-click",
        "clear-cart",
        "qty-plus <id>",
        "qty-minus <id>",
        "qty-input <id> <text>",
        "qty-blur <id>",
        "add-to-cart <id>",
    ];

    /// The action's identifier, without arguments.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Self::ToggleMenu => "toggle-menu",
            Self::OpenCart => "open-cart",
            Self::CloseCart => "close-cart",
            Self::BackdropClick => "backdrop-click",
            Self::ClearCart => "clear-cart",
            Self::Increment(_) => "qty-plus",
            Self::Decrement(_) => "qty-minus",
            Self::SetQuantity(..) => "qty-input",
            Self::FinalizeQuantity(_) => "qty-blur",
            Self::AddToCart(_) => "add-to-cart",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increment(id)
            | Self::Decrement(id)
            | Self::FinalizeQuantity(id)
            | Self::AddToCart(id) => write!(f, "{} {id}", self.identifier()),
            Self::SetQuantity(id, text) => write!(f, "{} {id} {text}", self.identifier()),
            _ => f.write_str(self.identifier()),
        }
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    /// Parse `"<identifier> [product-id] [text]"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim_start();
        let (product, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));

        let product_id = |label: &'static str| -> Result<ProductId, ActionParseError> {
            if product.is_empty() {
                return Err(ActionParseError::MissingProduct(label));
            }
            Ok(ProductId::parse(product)?)
        };

        match name {
            "toggle-menu" => Ok(Self::ToggleMenu),
            "open-cart" => Ok(Self::OpenCart),
            "close-cart" => Ok(Self::CloseCart),
            "backdrop-click" => Ok(Self::BackdropClick),
            "clear-cart" => Ok(Self::ClearCart),
            "qty-plus" => Ok(Self::Increment(product_id("qty-plus")?)),
            "qty-minus" => Ok(Self::Decrement(product_id("qty-minus")?)),
            "qty-input" => Ok(Self::SetQuantity(
                product_id("qty-input")?,
                text.trim().to_owned(),
            )),
            "qty-blur" => Ok(Self::FinalizeQuantity(product_id("qty-blur")?)),
            "add-to-cart" => Ok(Self::AddToCart(product_id("add-to-cart")?)),
            other => Err(ActionParseError::Unknown(other.to_owned())),
        }
    }
}

/// A presentation-level consequence of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The navigation menu opened or closed.
    MenuToggled { open: bool },
    /// The cart modal was rendered and shown.
    CartOpened(CartView),
    /// The cart modal was hidden.
    CartClosed,
    /// The open cart modal was re-rendered.
    CartRendered(CartView),
    /// The count badge changed.
    CountChanged(u64),
    /// A product card's pending quantity or total changed.
    PendingChanged {
        id: ProductId,
        pending: u32,
        total: Price,
    },
    /// A product card's add control is acknowledging until `until`.
    Acknowledged {
        id: ProductId,
        token: AckToken,
        until: Instant,
    },
    /// A product card's add control went back to rest.
    AckReverted { id: ProductId },
    /// The page has no control for this action.
    Ignored,
}

/// One product card: the product, its pending quantity and its add control.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub product: Product,
    pub control: ProductControl,
    pub ack: Acknowledgment,
}

impl ProductCard {
    fn pending_changed(&self) -> Effect {
        Effect::PendingChanged {
            id: self.product.id.clone(),
            pending: self.control.pending(),
            total: self.control.pending_total(),
        }
    }
}

/// The cart widget mounted on a storefront page.
#[derive(Debug)]
pub struct Storefront<S> {
    cart: CartState<S>,
    layout: PageLayout,
    menu_open: bool,
    cart_open: bool,
    cards: Vec<ProductCard>,
}

impl<S: KeyValueStore> Storefront<S> {
    /// Mount the widget on the page described by `catalog`.
    pub fn new(cart: CartState<S>, catalog: &Catalog, ack_delay: Duration) -> Self {
        let cards = catalog
            .products()
            .into_iter()
            .map(|product| ProductCard {
                control: ProductControl::new(product.price),
                ack: Acknowledgment::new(ack_delay),
                product,
            })
            .collect();

        Self {
            cart,
            layout: catalog.page,
            menu_open: false,
            cart_open: false,
            cards,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &CartState<S> {
        &self.cart
    }

    #[must_use]
    pub const fn layout(&self) -> &PageLayout {
        &self.layout
    }

    #[must_use]
    pub const fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    #[must_use]
    pub fn cards(&self) -> &[ProductCard] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, id: &ProductId) -> Option<&ProductCard> {
        self.cards.iter().find(|card| &card.product.id == id)
    }

    /// The count badge value, if the page has a badge.
    #[must_use]
    pub fn count_badge(&self) -> Option<u64> {
        self.layout.count_badge.then(|| self.cart.total_count())
    }

    /// Render the current cart.
    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::from_items(self.cart.items())
    }

    /// Apply `action` and report what the page should show.
    ///
    /// `confirm` is only consulted by [`Action::ClearCart`]. `now` stamps
    /// add acknowledgments.
    #[instrument(skip(self, confirm, now), fields(action = %action))]
    pub fn dispatch(
        &mut self,
        action: Action,
        confirm: &mut impl Confirm,
        now: Instant,
    ) -> Vec<Effect> {
        let effects = match action {
            Action::ToggleMenu => self.toggle_menu(),
            Action::OpenCart => self.open_cart(),
            Action::CloseCart => self.close_cart(),
            Action::BackdropClick => self.backdrop_click(),
            Action::ClearCart => self.clear_cart(confirm),
            Action::Increment(id) => self.adjust(&id, |control| {
                control.increment();
            }),
            Action::Decrement(id) => self.adjust(&id, |control| {
                control.decrement();
            }),
            Action::SetQuantity(id, text) => self.adjust(&id, |control| {
                control.set_raw(&text);
            }),
            Action::FinalizeQuantity(id) => self.adjust(&id, |control| {
                control.finalize();
            }),
            Action::AddToCart(id) => self.add_to_cart(&id, now),
        };

        if effects.contains(&Effect::Ignored) {
            debug!("Action has no control on this page");
        }
        effects
    }

    /// Revert a product card's acknowledgment when its timer fires.
    ///
    /// Returns [`Effect::AckReverted`] only if `token` is still the card's
    /// current trigger; a timer superseded by a later add does nothing.
    pub fn revert_ack(&mut self, id: &ProductId, token: AckToken) -> Option<Effect> {
        let card = self.cards.iter_mut().find(|card| &card.product.id == id)?;
        if !card.ack.revert(token) {
            debug!(%id, "Acknowledgment timer superseded");
            return None;
        }
        Some(Effect::AckReverted { id: id.clone() })
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    fn toggle_menu(&mut self) -> Vec<Effect> {
        if !self.layout.menu {
            return vec![Effect::Ignored];
        }
        self.menu_open = !self.menu_open;
        vec![Effect::MenuToggled {
            open: self.menu_open,
        }]
    }

    fn open_cart(&mut self) -> Vec<Effect> {
        if !(self.layout.cart_link && self.layout.cart_modal) {
            return vec![Effect::Ignored];
        }
        self.cart_open = true;
        vec![Effect::CartOpened(self.cart_view())]
    }

    fn close_cart(&mut self) -> Vec<Effect> {
        if !(self.layout.close_button && self.layout.cart_modal) {
            return vec![Effect::Ignored];
        }
        self.cart_open = false;
        vec![Effect::CartClosed]
    }

    fn backdrop_click(&mut self) -> Vec<Effect> {
        if !(self.layout.cart_modal && self.cart_open) {
            return vec![Effect::Ignored];
        }
        self.cart_open = false;
        vec![Effect::CartClosed]
    }

    fn clear_cart(&mut self, confirm: &mut impl Confirm) -> Vec<Effect> {
        if !self.layout.clear_button {
            return vec![Effect::Ignored];
        }
        if !self.cart.clear(confirm) {
            return Vec::new();
        }
        self.after_cart_change()
    }

    fn adjust(&mut self, id: &ProductId, apply: impl FnOnce(&mut ProductControl)) -> Vec<Effect> {
        let Some(card) = self.cards.iter_mut().find(|card| &card.product.id == id) else {
            return vec![Effect::Ignored];
        };
        apply(&mut card.control);
        vec![card.pending_changed()]
    }

    fn add_to_cart(&mut self, id: &ProductId, now: Instant) -> Vec<Effect> {
        let Some(card) = self.cards.iter_mut().find(|card| &card.product.id == id) else {
            return vec![Effect::Ignored];
        };

        let quantity = card.control.take_for_add();
        self.cart.add_item(
            card.product.id.clone(),
            &card.product.name,
            card.product.price,
            i64::from(quantity.get()),
        );

        let token = card.ack.trigger(now);
        let mut effects = vec![
            Effect::Acknowledged {
                id: card.product.id.clone(),
                token,
                until: card.ack.next_deadline().unwrap_or(now),
            },
            card.pending_changed(),
        ];
        effects.extend(self.after_cart_change());
        effects
    }

    fn after_cart_change(&self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(count) = self.count_badge() {
            effects.push(Effect::CountChanged(count));
        }
        if self.layout.cart_modal && self.cart_open {
            effects.push(Effect::CartRendered(self.cart_view()));
        }
        effects
    }
}
