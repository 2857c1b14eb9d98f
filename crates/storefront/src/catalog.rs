//! Page layout and product catalog.
//!
//! A catalog file describes the page the widget is mounted on: which
//! controls exist and which product cards are shown. Controls that are
//! absent leave their feature inert, and product cards missing an id or a
//! usable price are skipped, mirroring how a page degrades when markup is
//! incomplete.
//!
//! String prices are read from their leading decimal number, so `"40.50 INR"`
//! is `40.5`. A string that does not start with a number is unusable.
//!
//! ```yaml
//! page:
//!   count_badge: true
//!   clear_button: false
//! products:
//!   - id: alphonso
//!     name: Alphonso Mango (1 kg)
//!     base_price: 1250
//!   - id: guava
//!     base_price: "40.50"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_yaml::Value;
use storecart_core::{Price, ProductId};
use thiserror::Error;
use tracing::{debug, info};

use crate::product::Product;

/// Errors that can occur when loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Which page controls are present.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Hamburger button plus navigation links.
    pub menu: bool,
    /// Link that opens the cart view.
    pub cart_link: bool,
    /// The cart modal with its item list and total.
    pub cart_modal: bool,
    /// Close control inside the modal.
    pub close_button: bool,
    /// Cart count badge in the header.
    pub count_badge: bool,
    /// Clear-cart control inside the modal.
    pub clear_button: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            menu: true,
            cart_link: true,
            cart_modal: true,
            close_button: true,
            count_badge: true,
            clear_button: true,
        }
    }
}

/// One product card as declared in the catalog file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Unit price, as a YAML number or a decimal string.
    #[serde(default)]
    pub base_price: Option<Value>,
    /// Whether the card has its quantity and add controls.
    #[serde(default = "default_true")]
    pub controls: bool,
}

const fn default_true() -> bool {
    true
}

impl CatalogEntry {
    /// Turn the entry into a product, or `None` if the card is unusable.
    #[must_use]
    pub fn to_product(&self) -> Option<Product> {
        if !self.controls {
            debug!(id = ?self.id, "Skipping product card without controls");
            return None;
        }

        let Some(id) = self.id.as_deref().and_then(|raw| ProductId::parse(raw).ok()) else {
            debug!(name = ?self.name, "Skipping product card without an id");
            return None;
        };

        let Some(price) = self.base_price.as_ref().and_then(parse_price) else {
            debug!(%id, "Skipping product card without a valid price");
            return None;
        };

        Some(Product::new(id, self.name.clone(), price))
    }
}

fn parse_price(value: &Value) -> Option<Price> {
    let amount = match value {
        Value::Number(n) => parse_decimal(&n.to_string())?,
        Value::String(s) => parse_decimal(leading_number(s)?)?,
        _ => return None,
    };
    Price::try_from(amount).ok()
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// The longest prefix of `s` (after leading whitespace) that reads as a
/// decimal number: optional sign, digits, optional fraction, optional
/// exponent. `None` if there are no digits.
fn leading_number(s: &str) -> Option<&str> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    s.get(..end)
}

/// The page layout and its product cards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub page: PageLayout,
    pub products: Vec<CatalogEntry>,
}

impl Catalog {
    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the text is not a valid catalog.
    pub fn from_yaml(text: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml(&text)?;
        info!(path = %path.display(), entries = catalog.products.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Usable products, in catalog order. Later duplicates of an id are dropped.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = Vec::new();
        for product in self.products.iter().filter_map(CatalogEntry::to_product) {
            if products.iter().any(|p| p.id == product.id) {
                debug!(id = %product.id, "Skipping duplicate product card");
                continue;
            }
            products.push(product);
        }
        products
    }
}
