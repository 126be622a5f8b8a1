//! Flat-rate fallback quotes.
//!
//! Prices a consignment from a fixed per-zone table when live carrier quotes
//! are unavailable. Pure and deterministic: the same request and origin always
//! produce the same quotes.
//!
//! # Pricing
//!
//! ```text
//! dead weight   = Σ weight × quantity
//! consignment   = max length × max width × min(Σ height × quantity, 200 cm)
//! cubic weight  = consignment m³ × 250 kg/m³
//! chargeable    = ceil(max(dead weight, cubic weight))
//! standard      = max(zone base + zone per-kg × chargeable + handling, zone minimum)
//! express       = standard × 1.5
//! ```
//!
//! [`quote`] never fails: if the calculation itself errors, it returns the
//! [`emergency_quotes`] table instead.

use core::fmt;

use fitout_core::{
    CurrencyCode, LineItem, Price, Quote, QuoteOrigin, QuoteRequest, ShippingClass, StateCode,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;
use thiserror::Error;

/// Carrier name shown on table-rated quotes.
pub const FALLBACK_CARRIER: &str = "Fitout Freight";

/// Stacked consignment height is capped here; taller loads go on a second pallet
/// space which the per-kg rate already covers.
pub const MAX_STACK_HEIGHT_CM: f64 = 200.0;

/// Australian road-freight cubic conversion factor.
const CUBIC_KG_PER_M3: f64 = 250.0;

/// Any single side longer than this needs two-person handling.
const OVERSIZE_LENGTH_CM: f64 = 180.0;

/// Any single unit heavier than this needs two-person handling.
const OVERSIZE_UNIT_WEIGHT_KG: f64 = 60.0;

/// Coarse distance classification between warehouse and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Zone {
    SameState,
    Interstate,
    Remote,
}

impl Zone {
    /// Classify a destination relative to the dispatch state.
    ///
    /// Same state wins over remote, so a WA warehouse shipping within WA is
    /// `SameState`.
    #[must_use]
    pub fn between(origin: StateCode, destination: StateCode) -> Self {
        if origin == destination {
            Self::SameState
        } else if destination.is_remote() {
            Self::Remote
        } else {
            Self::Interstate
        }
    }

    const fn rates(self) -> ZoneRates {
        match self {
            Self::SameState => ZoneRates {
                base_cents: 1_500,
                per_kg_cents: 45,
                minimum_cents: 1_995,
                standard_days: 3,
                express_days: 1,
            },
            Self::Interstate => ZoneRates {
                base_cents: 2_500,
                per_kg_cents: 85,
                minimum_cents: 2_995,
                standard_days: 6,
                express_days: 3,
            },
            Self::Remote => ZoneRates {
                base_cents: 4_500,
                per_kg_cents: 160,
                minimum_cents: 4_995,
                standard_days: 10,
                express_days: 5,
            },
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SameState => "same-state",
            Self::Interstate => "interstate",
            Self::Remote => "remote",
        })
    }
}

/// One row of the rate table. Amounts in AUD cents.
#[derive(Debug, Clone, Copy)]
struct ZoneRates {
    base_cents: i64,
    per_kg_cents: i64,
    minimum_cents: i64,
    standard_days: u32,
    express_days: u32,
}

/// Errors inside the rate calculation. Never surfaced to callers of [`quote`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackError {
    #[error("consignment has no items")]
    NoItems,
    #[error("item {item} has an unusable {field}")]
    InvalidMeasurement { item: String, field: &'static str },
    #[error("rate calculation overflowed")]
    Overflow,
}

/// The whole order treated as one consignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Consignment {
    pub dead_weight_kg: f64,
    pub length_cm: f64,
    pub width_cm: f64,
    /// Stacked height, already capped at [`MAX_STACK_HEIGHT_CM`].
    pub height_cm: f64,
    /// Most demanding handling class in the order.
    pub class: ShippingClass,
}

impl Consignment {
    /// Aggregate line items into a single consignment.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no items or any measurement is not a
    /// finite positive number.
    pub fn from_items(items: &[LineItem]) -> Result<Self, FallbackError> {
        if items.is_empty() {
            return Err(FallbackError::NoItems);
        }

        let mut consignment = Self {
            dead_weight_kg: 0.0,
            length_cm: 0.0,
            width_cm: 0.0,
            height_cm: 0.0,
            class: ShippingClass::Standard,
        };

        for item in items {
            let dims = item.dimensions;
            for (field, value) in [
                ("weight", item.weight),
                ("length", dims.length),
                ("width", dims.width),
                ("height", dims.height),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(FallbackError::InvalidMeasurement {
                        item: item.id.clone(),
                        field,
                    });
                }
            }

            let quantity = f64::from(item.quantity);
            consignment.dead_weight_kg += item.line_weight();
            consignment.length_cm = consignment.length_cm.max(dims.length);
            consignment.width_cm = consignment.width_cm.max(dims.width);
            consignment.height_cm += dims.height * quantity;

            let mut class = item.class();
            if dims.longest_side() > OVERSIZE_LENGTH_CM || item.weight > OVERSIZE_UNIT_WEIGHT_KG {
                class = class.max(ShippingClass::Oversized);
            }
            consignment.class = consignment.class.max(class);
        }

        consignment.height_cm = consignment.height_cm.min(MAX_STACK_HEIGHT_CM);
        Ok(consignment)
    }

    /// Cubic weight in kilograms.
    #[must_use]
    pub fn cubic_weight_kg(&self) -> f64 {
        self.length_cm * self.width_cm * self.height_cm * CUBIC_KG_PER_M3 / 1_000_000.0
    }

    /// Greater of dead and cubic weight, rounded up to a whole kilogram.
    #[must_use]
    pub fn chargeable_weight_kg(&self) -> f64 {
        self.dead_weight_kg.max(self.cubic_weight_kg()).ceil()
    }
}

/// Handling surcharge for a class, in cents.
const fn handling_cents(class: ShippingClass) -> i64 {
    match class {
        ShippingClass::Standard => 0,
        ShippingClass::Oversized => 3_500,
        ShippingClass::Freight => 9_500,
    }
}

fn restrictions(zone: Zone, class: ShippingClass) -> Vec<String> {
    let mut notes = Vec::new();
    if zone == Zone::Remote {
        notes.push("Remote area: collection from the nearest depot may be required".to_string());
    }
    match class {
        ShippingClass::Standard => {}
        ShippingClass::Oversized => {
            notes.push("Two-person delivery; no PO boxes or parcel lockers".to_string());
        }
        ShippingClass::Freight => {
            notes.push("Palletised delivery; forklift or tail-lift unloading not included".to_string());
        }
    }
    notes
}

/// Price a request from the rate table, falling back to [`emergency_quotes`]
/// if the calculation fails. Always returns at least two quotes.
#[must_use]
pub fn quote(request: &QuoteRequest, origin: StateCode) -> Vec<Quote> {
    match calculate(request, origin) {
        Ok(quotes) => quotes,
        Err(err) => {
            tracing::error!(error = %err, "Flat-rate calculation failed, using emergency rates");
            emergency_quotes()
        }
    }
}

/// Price a request from the rate table.
///
/// # Errors
///
/// Returns an error if the items cannot be aggregated or the price cannot be
/// represented.
pub fn calculate(request: &QuoteRequest, origin: StateCode) -> Result<Vec<Quote>, FallbackError> {
    let consignment = Consignment::from_items(&request.items)?;
    let zone = Zone::between(origin, request.delivery_address.state);
    let rates = zone.rates();

    let chargeable =
        Decimal::from_f64(consignment.chargeable_weight_kg()).ok_or(FallbackError::Overflow)?;
    let per_kg = Decimal::new(rates.per_kg_cents, 2);
    let standard = per_kg
        .checked_mul(chargeable)
        .and_then(|freight| freight.checked_add(Decimal::new(rates.base_cents, 2)))
        .and_then(|price| {
            price.checked_add(Decimal::new(handling_cents(consignment.class), 2))
        })
        .ok_or(FallbackError::Overflow)?
        .max(Decimal::new(rates.minimum_cents, 2));
    let standard = to_cents(standard);
    let express = to_cents(
        standard
            .checked_mul(Decimal::new(15, 1))
            .ok_or(FallbackError::Overflow)?,
    );

    tracing::debug!(
        %zone,
        chargeable_kg = %chargeable,
        class = consignment.class.as_str(),
        %standard,
        "Flat-rate quote calculated"
    );

    let notes = restrictions(zone, consignment.class);
    Ok(vec![
        table_quote(
            "Standard",
            standard,
            rates.standard_days,
            format!("Road freight, {zone} rate"),
            notes.clone(),
        ),
        table_quote(
            "Express",
            express,
            rates.express_days,
            format!("Priority linehaul, {zone} rate"),
            notes,
        ),
    ])
}

/// Whole AUD cents, halves rounded up.
fn to_cents(amount: Decimal) -> Decimal {
    Price::new(amount, CurrencyCode::AUD).round_to_cents().amount
}

/// Fixed rates used when even the table calculation fails.
#[must_use]
pub fn emergency_quotes() -> Vec<Quote> {
    vec![
        table_quote(
            "Standard",
            Price::aud_cents(9_900).amount,
            10,
            "Road freight, flat rate".to_string(),
            Vec::new(),
        ),
        table_quote(
            "Express",
            Price::aud_cents(14_900).amount,
            5,
            "Priority linehaul, flat rate".to_string(),
            Vec::new(),
        ),
    ]
}

fn table_quote(
    service_name: &str,
    price: Decimal,
    delivery_days: u32,
    description: String,
    restrictions: Vec<String>,
) -> Quote {
    Quote {
        service_name: service_name.to_string(),
        price,
        delivery_days,
        carrier_name: FALLBACK_CARRIER.to_string(),
        description,
        restrictions,
        origin: QuoteOrigin::Fallback,
        carrier_id: None,
        service_code: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use fitout_core::{Address, DEFAULT_COUNTRY, Dimensions, Postcode};

    use super::*;

    fn item(weight: f64, dims: (f64, f64, f64), quantity: u32) -> LineItem {
        LineItem {
            id: "item".to_string(),
            name: "Item".to_string(),
            quantity,
            weight,
            dimensions: Dimensions {
                length: dims.0,
                width: dims.1,
                height: dims.2,
            },
            price: Decimal::new(100, 0),
            shipping_class: None,
        }
    }

    fn request_to(state: StateCode, postcode: &str, items: Vec<LineItem>) -> QuoteRequest {
        QuoteRequest {
            delivery_address: Address {
                street: "1 Test St".to_string(),
                city: "Testville".to_string(),
                state,
                postcode: Postcode::parse(postcode).unwrap(),
                country: DEFAULT_COUNTRY.to_string(),
            },
            items,
            total_value: Decimal::new(1000, 0),
        }
    }

    fn drawer_system() -> Vec<LineItem> {
        vec![item(120.0, (180.0, 120.0, 30.0), 1)]
    }

    fn standard_price(state: StateCode, postcode: &str, items: Vec<LineItem>) -> Decimal {
        calculate(&request_to(state, postcode, items), StateCode::Vic).unwrap()[0].price
    }

    #[test]
    fn test_zone_between() {
        assert_eq!(Zone::between(StateCode::Vic, StateCode::Vic), Zone::SameState);
        assert_eq!(Zone::between(StateCode::Vic, StateCode::Nsw), Zone::Interstate);
        assert_eq!(Zone::between(StateCode::Vic, StateCode::Tas), Zone::Interstate);
        assert_eq!(Zone::between(StateCode::Vic, StateCode::Wa), Zone::Remote);
        assert_eq!(Zone::between(StateCode::Vic, StateCode::Nt), Zone::Remote);
        assert_eq!(Zone::between(StateCode::Wa, StateCode::Wa), Zone::SameState);
    }

    #[test]
    fn test_consignment_aggregation() {
        let consignment = Consignment::from_items(&[
            item(10.0, (100.0, 40.0, 20.0), 2),
            item(5.0, (60.0, 80.0, 10.0), 1),
        ])
        .unwrap();
        assert!((consignment.dead_weight_kg - 25.0).abs() < f64::EPSILON);
        assert!((consignment.length_cm - 100.0).abs() < f64::EPSILON);
        assert!((consignment.width_cm - 80.0).abs() < f64::EPSILON);
        assert!((consignment.height_cm - 50.0).abs() < f64::EPSILON);
        assert_eq!(consignment.class, ShippingClass::Standard);
    }

    #[test]
    fn test_stack_height_is_capped() {
        let consignment = Consignment::from_items(&[item(1.0, (50.0, 50.0, 40.0), 10)]).unwrap();
        assert!((consignment.height_cm - MAX_STACK_HEIGHT_CM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_chargeable_weight_uses_cubic_when_bulky() {
        let consignment = Consignment::from_items(&drawer_system()).unwrap();
        // 1.8 × 1.2 × 0.3 m = 0.648 m³ → 162 kg cubic
        assert!((consignment.cubic_weight_kg() - 162.0).abs() < 1e-9);
        assert!((consignment.chargeable_weight_kg() - 162.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heavy_unit_is_oversized() {
        let consignment = Consignment::from_items(&drawer_system()).unwrap();
        assert_eq!(consignment.class, ShippingClass::Oversized);
    }

    #[test]
    fn test_declared_freight_class_wins() {
        let mut items = vec![item(2.0, (30.0, 30.0, 30.0), 1)];
        items[0].shipping_class = Some(ShippingClass::Freight);
        let consignment = Consignment::from_items(&items).unwrap();
        assert_eq!(consignment.class, ShippingClass::Freight);
    }

    #[test]
    fn test_melbourne_drawer_system_prices() {
        // 15.00 + 0.45 × 162 + 35.00 handling
        assert_eq!(
            standard_price(StateCode::Vic, "3000", drawer_system()),
            Decimal::new(12_290, 2)
        );
        // 45.00 + 1.60 × 162 + 35.00 handling
        assert_eq!(
            standard_price(StateCode::Wa, "6000", drawer_system()),
            Decimal::new(33_920, 2)
        );
    }

    #[test]
    fn test_same_state_cheaper_than_remote() {
        let local = standard_price(StateCode::Vic, "3000", drawer_system());
        assert!(local < standard_price(StateCode::Wa, "6000", drawer_system()));
        assert!(local < standard_price(StateCode::Nt, "0800", drawer_system()));
    }

    #[test]
    fn test_zone_pricing_is_monotonic() {
        let parcels = [
            vec![item(0.5, (20.0, 15.0, 5.0), 1)],
            vec![item(12.0, (60.0, 40.0, 40.0), 3)],
            drawer_system(),
        ];
        for parcel in parcels {
            let same = standard_price(StateCode::Vic, "3000", parcel.clone());
            let inter = standard_price(StateCode::Nsw, "2000", parcel.clone());
            let remote = standard_price(StateCode::Wa, "6000", parcel);
            assert!(same <= inter, "{same} > {inter}");
            assert!(inter <= remote, "{inter} > {remote}");
        }
    }

    #[test]
    fn test_minimum_charge_applies() {
        let price = standard_price(StateCode::Vic, "3000", vec![item(0.2, (10.0, 10.0, 5.0), 1)]);
        assert_eq!(price, Decimal::new(1_995, 2));
    }

    #[test]
    fn test_express_half_cent_rounds_up() {
        let request = request_to(StateCode::Vic, "3000", vec![item(0.2, (10.0, 10.0, 5.0), 1)]);
        let quotes = calculate(&request, StateCode::Vic).unwrap();
        assert_eq!(quotes[1].price, Decimal::new(2_993, 2));
    }

    #[test]
    fn test_express_dearer_and_faster() {
        let quotes = calculate(&request_to(StateCode::Qld, "4000", drawer_system()), StateCode::Vic)
            .unwrap();
        assert_eq!(quotes.len(), 2);
        let (standard, express) = (&quotes[0], &quotes[1]);
        assert!(express.price > standard.price);
        assert!(express.delivery_days < standard.delivery_days);
        assert!(quotes.iter().all(|q| q.origin == QuoteOrigin::Fallback));
    }

    #[test]
    fn test_deterministic() {
        let request = request_to(StateCode::Sa, "5000", drawer_system());
        assert_eq!(quote(&request, StateCode::Vic), quote(&request, StateCode::Vic));
    }

    #[test]
    fn test_remote_oversized_restrictions() {
        let quotes = quote(&request_to(StateCode::Nt, "0800", drawer_system()), StateCode::Vic);
        assert_eq!(quotes[0].restrictions.len(), 2);
        assert!(quotes[0].restrictions[0].contains("Remote"));
    }

    #[test]
    fn test_overflow_uses_emergency_rates() {
        let request = request_to(StateCode::Vic, "3000", vec![item(1e300, (10.0, 10.0, 10.0), 1)]);
        assert_eq!(calculate(&request, StateCode::Vic), Err(FallbackError::Overflow));
        assert_eq!(quote(&request, StateCode::Vic), emergency_quotes());
    }

    #[test]
    fn test_invalid_measurement_uses_emergency_rates() {
        let request = request_to(StateCode::Vic, "3000", vec![item(f64::NAN, (10.0, 10.0, 10.0), 1)]);
        assert!(matches!(
            calculate(&request, StateCode::Vic),
            Err(FallbackError::InvalidMeasurement { field: "weight", .. })
        ));
        let quotes = quote(&request, StateCode::Vic);
        assert_eq!(quotes.len(), 2);
    }

    #[test]
    fn test_no_items_uses_emergency_rates() {
        let request = request_to(StateCode::Vic, "3000", Vec::new());
        assert_eq!(calculate(&request, StateCode::Vic), Err(FallbackError::NoItems));
        assert_eq!(quote(&request, StateCode::Vic).len(), 2);
    }

    #[test]
    fn test_every_quote_is_positive() {
        for state in StateCode::ALL {
            let request = request_to(state, "2600", vec![item(0.1, (1.0, 1.0, 1.0), 1)]);
            for q in quote(&request, StateCode::Vic) {
                assert!(q.price > Decimal::ZERO);
            }
        }
        assert!(emergency_quotes().iter().all(|q| q.price > Decimal::ZERO));
    }
}
