//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront runs in a single currency, so a [`Price`] is just a
//! non-negative decimal amount. Display uses the Indian rupee symbol and
//! en-IN digit grouping: the last three integer digits form one group and
//! every group above it has two digits (`₹12,34,567.5`).

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Currency symbol prefixed to every displayed amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Maximum number of fraction digits shown when formatting.
const MAX_FRACTION_DIGITS: u32 = 3;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative amount in the store currency.
///
/// Persisted as a plain JSON number so stored carts stay readable by any
/// client that shares the storage key.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use storecart_core::Price;
///
/// let price = Price::new(Decimal::new(12_345_675, 1)).unwrap();
/// assert_eq!(price.to_string(), "₹12,34,567.5");
/// assert_eq!((price * 2).to_string(), "₹24,69,135");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Format the amount with en-IN grouping, without the currency symbol.
    #[must_use]
    pub fn format_amount(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let text = rounded.to_string();
        match text.split_once('.') {
            Some((int_part, frac)) => format!("{}.{frac}", group_en_in(int_part)),
            None => group_en_in(&text),
        }
    }
}

/// Group integer digits the en-IN way: `1234567` becomes `12,34,567`.
fn group_en_in(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(head.get(start..end).unwrap_or_default());
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{}", self.format_amount())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Whole amounts are written as JSON integers (`100`, not `100.0`) so a cart
/// written by another client is saved back byte for byte.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let normalized = self.0.normalize();
        if normalized.scale() == 0
            && let Some(units) = normalized.to_u64()
        {
            return serializer.serialize_u64(units);
        }
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 0)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
        assert!(matches!("-5".parse::<Price>(), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_display_small_amounts() {
        assert_eq!(Price::ZERO.to_string(), "₹0");
        assert_eq!(price("300").to_string(), "₹300");
        assert_eq!(price("999.00").to_string(), "₹999");
    }

    #[test]
    fn test_display_en_in_grouping() {
        assert_eq!(price("1000").to_string(), "₹1,000");
        assert_eq!(price("100000").to_string(), "₹1,00,000");
        assert_eq!(price("1234567.5").to_string(), "₹12,34,567.5");
        assert_eq!(price("123456789").to_string(), "₹12,34,56,789");
    }

    #[test]
    fn test_display_rounds_to_three_places() {
        assert_eq!(price("1.23456").to_string(), "₹1.235");
        assert_eq!(price("0.0005").to_string(), "₹0.001");
        assert_eq!(price("2.10").to_string(), "₹2.1");
    }

    #[test]
    fn test_line_total_and_sum() {
        let total: Price = [price("100") * 3, price("49.5") * 2].into_iter().sum();
        assert_eq!(total, price("399"));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&price("99.99")).unwrap();
        assert_eq!(json, "99.99");

        let back: Price = serde_json::from_str("100").unwrap();
        assert_eq!(back, price("100"));
    }

    #[test]
    fn test_whole_amounts_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&price("100")).unwrap(), "100");
        assert_eq!(serde_json::to_string(&price("250.00")).unwrap(), "250");
        assert_eq!(serde_json::to_string(&Price::ZERO).unwrap(), "0");
        assert_eq!(serde_json::to_string(&price("49.5")).unwrap(), "49.5");

        for raw in ["100", "49.5", "0"] {
            let back: Price = serde_json::from_str(raw).unwrap();
            assert_eq!(serde_json::to_string(&back).unwrap(), raw);
        }
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }
}
