//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create an AUD price from a whole number of cents.
    #[must_use]
    pub fn aud_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2), CurrencyCode::AUD)
    }

    /// Round to whole cents, halves away from zero.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self::new(
            self.amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            self.currency_code,
        )
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl fmt::Display for Price {
    /// Formats as e.g. `A$19.99`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    AUD,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::AUD => "A$",
        }
    }
}
