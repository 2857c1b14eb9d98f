//! Clamped purchase quantity.

use core::fmt;

/// A quantity a shopper can request in a single add-to-cart.
///
/// Always within `[Quantity::MIN, Quantity::MAX]`. Every constructor clamps
/// instead of failing, because quantities come from free-form input fields
/// and the widget never surfaces an error for them.
///
/// ## Examples
///
/// ```
/// use storecart_core::Quantity;
///
/// assert_eq!(Quantity::clamp(12).get(), 12);
/// assert_eq!(Quantity::clamp(5000).get(), 999);
/// assert_eq!(Quantity::clamp(-3).get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u16);

impl Quantity {
    /// Smallest allowed quantity.
    pub const MIN: Self = Self(1);
    /// Largest allowed quantity.
    pub const MAX: Self = Self(999);

    /// Constrain any integer to the allowed range.
    #[must_use]
    pub fn clamp(value: i64) -> Self {
        let bounded = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        Self(u16::try_from(bounded).unwrap_or(Self::MIN.0))
    }

    /// The numeric value.
    #[must_use]
    pub fn get(self) -> u32 {
        u32::from(self.0)
    }

    /// One more, stopping at [`Quantity::MAX`].
    #[must_use]
    pub fn increment(self) -> Self {
        Self::clamp(i64::from(self.0) + 1)
    }

    /// One less, stopping at [`Quantity::MIN`].
    #[must_use]
    pub fn decrement(self) -> Self {
        Self::clamp(i64::from(self.0) - 1)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
