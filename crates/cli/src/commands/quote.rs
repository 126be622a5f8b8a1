//! Quote commands.
//!
//! Builds a request from command-line items and prints the resolved quotes as
//! JSON on stdout. Offline quotes use the flat-rate table only; live quotes go
//! through the same resolver as the storefront.

use fitout_core::{
    Address, DEFAULT_COUNTRY, Dimensions, LineItem, Postcode, PostcodeError, QuoteRequest,
    ShippingClass, StateCode,
};
use fitout_storefront::AppState;
use fitout_storefront::bigpost::{BigPostError, WAREHOUSE};
use fitout_storefront::config::{ConfigError, StorefrontConfig};
use fitout_storefront::shipping::fallback::{self, Consignment, Zone};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while quoting from the CLI.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// An `--item` value could not be parsed.
    #[error("Invalid item '{item}': {reason}")]
    InvalidItem { item: String, reason: String },

    /// Postcode is not four digits.
    #[error("Invalid postcode: {0}")]
    Postcode(#[from] PostcodeError),

    /// Storefront configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// BigPost client could not be built.
    #[error("BigPost error: {0}")]
    BigPost(#[from] BigPostError),

    /// Output could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parsed `quote` arguments.
pub struct QuoteArgs {
    pub state: StateCode,
    pub postcode: String,
    pub items: Vec<String>,
    pub class: Option<ShippingClass>,
    pub from: Option<StateCode>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteOutput<T: Serialize> {
    #[serde(flatten)]
    detail: T,
    quotes: Vec<fitout_core::Quote>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OfflineDetail {
    zone: Zone,
    chargeable_weight_kg: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LiveDetail {
    fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<&'static str>,
}

/// Print flat-rate quotes.
///
/// # Errors
///
/// Returns an error if an item or the postcode is invalid.
pub fn offline(args: &QuoteArgs) -> Result<(), QuoteError> {
    let request = build_request(args)?;
    let origin = args.from.unwrap_or(WAREHOUSE.state);

    let chargeable_weight_kg = Consignment::from_items(&request.items)
        .map(|c| c.chargeable_weight_kg())
        .unwrap_or_default();

    print_json(&QuoteOutput {
        detail: OfflineDetail {
            zone: Zone::between(origin, request.delivery_address.state),
            chargeable_weight_kg,
        },
        quotes: fallback::quote(&request, origin),
    })
}

/// Print quotes resolved the way the storefront would resolve them.
///
/// # Errors
///
/// Returns an error if the arguments or the environment configuration are
/// invalid.
pub async fn live(args: &QuoteArgs) -> Result<(), QuoteError> {
    let request = build_request(args)?;

    let mut config = StorefrontConfig::from_env()?;
    if let Some(from) = args.from {
        config.shipping.origin = from;
    }
    let state = AppState::new(config)?;
    let resolution = state.resolver().resolve(&request).await;

    print_json(&QuoteOutput {
        detail: LiveDetail {
            fallback_used: resolution.fallback_used,
            fallback_reason: resolution.fallback_reason.as_ref().map(|r| r.code()),
        },
        quotes: resolution.quotes,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), QuoteError> {
    let json = serde_json::to_string_pretty(value)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}

fn build_request(args: &QuoteArgs) -> Result<QuoteRequest, QuoteError> {
    let postcode = Postcode::parse(&args.postcode)?;
    let items = args
        .items
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_item(i, raw, args.class))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuoteRequest {
        delivery_address: Address {
            street: "CLI quote".to_string(),
            city: "CLI quote".to_string(),
            state: args.state,
            postcode,
            country: DEFAULT_COUNTRY.to_string(),
        },
        items,
        total_value: Decimal::ZERO,
    })
}

/// Parse `weight,length,width,height[,quantity]`.
fn parse_item(
    index: usize,
    raw: &str,
    class: Option<ShippingClass>,
) -> Result<LineItem, QuoteError> {
    let invalid = |reason: &str| QuoteError::InvalidItem {
        item: raw.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    let (measures, quantity) = match fields.as_slice() {
        [w, l, wd, h] => ([*w, *l, *wd, *h], "1"),
        [w, l, wd, h, q] => ([*w, *l, *wd, *h], *q),
        _ => return Err(invalid("expected weight,length,width,height[,quantity]")),
    };

    let mut values = [0.0_f64; 4];
    for (slot, field) in values.iter_mut().zip(measures) {
        let value: f64 = field
            .parse()
            .map_err(|_| invalid("measurements must be numbers"))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid("measurements must be greater than 0"));
        }
        *slot = value;
    }
    let quantity: u32 = quantity
        .parse()
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| invalid("quantity must be a positive whole number"))?;

    let [weight, length, width, height] = values;
    Ok(LineItem {
        id: format!("item-{}", index + 1),
        name: format!("Item {}", index + 1),
        quantity,
        weight,
        dimensions: Dimensions {
            length,
            width,
            height,
        },
        price: Decimal::ZERO,
        shipping_class: class,
    })
}
