//! Shipping quotes and the request that produces them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Address, LineItem, Price};

/// Where a quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteOrigin {
    /// The external carrier aggregator.
    Primary,
    /// The local flat-rate table.
    Fallback,
}

/// One shipping option offered to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub service_name: String,
    /// Price in AUD including GST.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub delivery_days: u32,
    pub carrier_name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<String>,
    pub origin: QuoteOrigin,
    /// Carrier identifier, needed to book a primary quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_id: Option<i64>,
    /// Carrier service code, needed to book a primary quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_code: Option<String>,
}

impl Quote {
    /// Price as a displayable AUD amount.
    #[must_use]
    pub fn display_price(&self) -> Price {
        Price::new(self.price, super::CurrencyCode::AUD)
    }

    /// Whether this quote can be booked with the carrier.
    #[must_use]
    pub const fn is_bookable(&self) -> bool {
        matches!(self.origin, QuoteOrigin::Primary) && self.carrier_id.is_some()
    }
}

/// A validated quote request: where it goes, what is in it, what it is worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub delivery_address: Address,
    /// Never empty once validated.
    pub items: Vec<LineItem>,
    /// Declared cart value in AUD.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
}

impl QuoteRequest {
    /// Sum of `weight x quantity` over every line, in kilograms.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.items.iter().map(LineItem::line_weight).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{DEFAULT_COUNTRY, Dimensions, Postcode, StateCode};

    fn item(weight: f64, quantity: u32) -> LineItem {
        LineItem {
            id: "sku".to_string(),
            name: "Part".to_string(),
            quantity,
            weight,
            dimensions: Dimensions {
                length: 10.0,
                width: 10.0,
                height: 10.0,
            },
            price: Decimal::ONE,
            shipping_class: None,
        }
    }

    fn request(items: Vec<LineItem>) -> QuoteRequest {
        QuoteRequest {
            delivery_address: Address {
                street: "1 Pier St".to_string(),
                city: "Perth".to_string(),
                state: StateCode::Wa,
                postcode: Postcode::parse("6000").unwrap(),
                country: DEFAULT_COUNTRY.to_string(),
            },
            items,
            total_value: Decimal::new(250, 0),
        }
    }

    #[test]
    fn test_totals() {
        let req = request(vec![item(2.5, 4), item(10.0, 1)]);
        assert!((req.total_weight() - 20.0).abs() < f64::EPSILON);
        assert_eq!(req.unit_count(), 5);
    }

    #[test]
    fn test_quote_serializes_for_checkout() {
        let quote = Quote {
            service_name: "Standard".to_string(),
            price: Decimal::new(4995, 2),
            delivery_days: 5,
            carrier_name: "Fitout Freight".to_string(),
            description: "Road freight".to_string(),
            restrictions: Vec::new(),
            origin: QuoteOrigin::Fallback,
            carrier_id: None,
            service_code: None,
        };
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["serviceName"], "Standard");
        assert_eq!(json["price"], 49.95);
        assert_eq!(json["deliveryDays"], 5);
        assert_eq!(json["origin"], "fallback");
        assert!(json.get("restrictions").is_none());
        assert!(json.get("carrierId").is_none());
        assert!(!quote.is_bookable());
        assert_eq!(quote.display_price().to_string(), "A$49.95");
    }
}
