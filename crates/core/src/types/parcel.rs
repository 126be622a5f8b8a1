//! Line items and their physical description.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Handling class declared for a product.
///
/// Classes are ordered by handling effort, so `max()` over a cart gives the
/// class the whole consignment must travel as.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ShippingClass {
    #[default]
    Standard,
    /// Long or awkward items (awnings, roof racks) needing two-person handling.
    Oversized,
    /// Palletised goods (drawer systems, canopies).
    Freight,
}

impl ShippingClass {
    /// Lower-case name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Oversized => "oversized",
            Self::Freight => "freight",
        }
    }
}

impl std::str::FromStr for ShippingClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "oversized" => Ok(Self::Oversized),
            "freight" => Ok(Self::Freight),
            other => Err(format!(
                "unknown shipping class '{other}' (expected standard, oversized or freight)"
            )),
        }
    }
}

/// Packed dimensions of a single unit, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Volume of one unit in cubic metres.
    #[must_use]
    pub fn volume_m3(&self) -> f64 {
        self.length * self.width * self.height / 1_000_000.0
    }

    /// Longest side, in centimetres.
    #[must_use]
    pub fn longest_side(&self) -> f64 {
        self.length.max(self.width).max(self.height)
    }
}

/// One product line in a quote or booking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    /// Weight of one unit in kilograms.
    pub weight: f64,
    pub dimensions: Dimensions,
    /// Declared unit price, used for transit insurance.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_class: Option<ShippingClass>,
}

impl LineItem {
    /// Weight of the whole line (`weight x quantity`) in kilograms.
    #[must_use]
    pub fn line_weight(&self) -> f64 {
        self.weight * f64::from(self.quantity)
    }

    /// Declared class, defaulting to [`ShippingClass::Standard`].
    #[must_use]
    pub fn class(&self) -> ShippingClass {
        self.shipping_class.unwrap_or_default()
    }
}
