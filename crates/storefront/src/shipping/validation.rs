//! Request validation.
//!
//! Requests are checked field by field against the raw JSON so that every
//! problem is reported at once, each with the path of the offending field
//! (`deliveryAddress.postcode`, `items[1].dimensions.height`).

use core::fmt;

use fitout_core::{
    Address, BookingRequest, Contact, DEFAULT_COUNTRY, Dimensions, Email, LineItem, Postcode,
    QuoteRequest, ShippingClass, StateCode,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Country spellings accepted for domestic delivery.
const DOMESTIC_COUNTRIES: [&str; 2] = ["australia", "au"];

/// One invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every invalid field in a request, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("request has {} invalid field(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any error is reported at exactly this path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|e| e.path == path)
    }

    fn finish<T>(mut self, value: Option<T>) -> Result<T, Self> {
        match value {
            Some(value) if self.is_empty() => Ok(value),
            Some(_) => Err(self),
            None => {
                if self.is_empty() {
                    self.push("body", "is invalid");
                }
                Err(self)
            }
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Validate a quote request body.
///
/// # Errors
///
/// Returns every invalid field when the body does not describe a valid
/// request.
pub fn validate_quote_request(body: &Value) -> Result<QuoteRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let request = body_object(body, &mut errors).and_then(|obj| quote_fields(obj, &mut errors));
    errors.finish(request)
}

/// Validate a booking request body: a quote request plus the chosen service
/// and a contact.
///
/// # Errors
///
/// Returns every invalid field when the body does not describe a valid
/// booking.
pub fn validate_booking_request(body: &Value) -> Result<BookingRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let booking = body_object(body, &mut errors).and_then(|obj| {
        let consignment = quote_fields(obj, &mut errors);
        let carrier_id = positive_id(obj.get("carrierId"), "carrierId", &mut errors);
        let service_code = required_text(obj.get("serviceCode"), "serviceCode", &mut errors);
        let contact = contact(obj.get("contact"), &mut errors);
        let reference = required_text(obj.get("reference"), "reference", &mut errors);

        Some(BookingRequest {
            consignment: consignment?,
            carrier_id: carrier_id?,
            service_code: service_code?,
            contact: contact?,
            reference: reference?,
        })
    });
    errors.finish(booking)
}

fn body_object<'a>(body: &'a Value, errors: &mut ValidationErrors) -> Option<&'a Map<String, Value>> {
    let obj = body.as_object();
    if obj.is_none() {
        errors.push("body", "must be a JSON object");
    }
    obj
}

fn quote_fields(obj: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<QuoteRequest> {
    let delivery_address = address(obj.get("deliveryAddress"), errors);
    let items = items(obj.get("items"), errors);
    let total_value = amount(obj.get("totalValue"), "totalValue", errors);

    Some(QuoteRequest {
        delivery_address: delivery_address?,
        items: items?,
        total_value: total_value?,
    })
}

/// Treat JSON `null` like an absent field.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn object<'a>(
    value: Option<&'a Value>,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a Map<String, Value>> {
    match present(value) {
        None => {
            errors.push(path, "is required");
            None
        }
        Some(Value::Object(obj)) => Some(obj),
        Some(_) => {
            errors.push(path, "must be an object");
            None
        }
    }
}

fn text<'a>(value: Option<&'a Value>, path: &str, errors: &mut ValidationErrors) -> Option<&'a str> {
    match present(value) {
        None => {
            errors.push(path, "is required");
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            errors.push(path, "must be a string");
            None
        }
    }
}

fn required_text(value: Option<&Value>, path: &str, errors: &mut ValidationErrors) -> Option<String> {
    let s = text(value, path, errors)?.trim();
    if s.is_empty() {
        errors.push(path, "cannot be empty");
        return None;
    }
    Some(s.to_string())
}

fn number(value: Option<&Value>, path: &str, errors: &mut ValidationErrors) -> Option<f64> {
    match present(value) {
        None => {
            errors.push(path, "is required");
            None
        }
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.is_finite() => Some(f),
            _ => {
                errors.push(path, "must be a finite number");
                None
            }
        },
        Some(_) => {
            errors.push(path, "must be a number");
            None
        }
    }
}

fn positive(value: Option<&Value>, path: &str, errors: &mut ValidationErrors) -> Option<f64> {
    let n = number(value, path, errors)?;
    if n <= 0.0 {
        errors.push(path, "must be greater than 0");
        return None;
    }
    Some(n)
}

/// Strictly positive whole number. Integral floats such as `2.0` are accepted.
fn whole(value: Option<&Value>, path: &str, errors: &mut ValidationErrors) -> Option<i64> {
    let n = number(value, path, errors)?;
    if n.fract() != 0.0 || n <= 0.0 || n > 9_007_199_254_740_991.0 {
        errors.push(path, "must be a positive whole number");
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let n = n as i64;
    Some(n)
}

fn quantity(value: Option<&Value>, path: &str, errors: &mut ValidationErrors) -> Option<u32> {
    let n = whole(value, path, errors)?;
    u32::try_from(n).ok().or_else(|| {
        errors.push(path, format!("must be at most {}", u32::MAX));
        None
    })
}

fn positive_id(value: Option<&Value>, path: &str, errors: &mut ValidationErrors) -> Option<i64> {
    whole(value, path, errors)
}

/// Non-negative money amount, kept exact where the JSON literal allows.
fn amount(value: Option<&Value>, path: &str, errors: &mut ValidationErrors) -> Option<Decimal> {
    let f = number(value, path, errors)?;
    if f < 0.0 {
        errors.push(path, "cannot be negative");
        return None;
    }
    let literal = present(value).map(ToString::to_string).unwrap_or_default();
    literal
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_f64(f))
        .or_else(|| {
            errors.push(path, "is out of range");
            None
        })
}

fn address(value: Option<&Value>, errors: &mut ValidationErrors) -> Option<Address> {
    const PATH: &str = "deliveryAddress";
    let obj = object(value, PATH, errors)?;

    let street = required_text(obj.get("street"), &format!("{PATH}.street"), errors);
    let city = required_text(obj.get("city"), &format!("{PATH}.city"), errors);

    let state_path = format!("{PATH}.state");
    let state = text(obj.get("state"), &state_path, errors).and_then(|s| {
        s.parse::<StateCode>()
            .map_err(|_| {
                let codes: Vec<&str> = StateCode::ALL.iter().map(|c| c.code()).collect();
                errors.push(&state_path, format!("must be one of {}", codes.join(", ")));
            })
            .ok()
    });

    let postcode_path = format!("{PATH}.postcode");
    let postcode = text(obj.get("postcode"), &postcode_path, errors).and_then(|s| {
        Postcode::parse(s)
            .map_err(|e| errors.push(&postcode_path, e.to_string()))
            .ok()
    });

    let country_path = format!("{PATH}.country");
    let country = match present(obj.get("country")) {
        None => Some(DEFAULT_COUNTRY.to_string()),
        Some(_) => text(obj.get("country"), &country_path, errors).and_then(|s| {
            if DOMESTIC_COUNTRIES.contains(&s.to_ascii_lowercase().as_str()) {
                Some(DEFAULT_COUNTRY.to_string())
            } else {
                errors.push(&country_path, "only Australian delivery is available");
                None
            }
        }),
    };

    Some(Address {
        street: street?,
        city: city?,
        state: state?,
        postcode: postcode?,
        country: country?,
    })
}

fn items(value: Option<&Value>, errors: &mut ValidationErrors) -> Option<Vec<LineItem>> {
    let list = match present(value) {
        None => {
            errors.push("items", "is required");
            return None;
        }
        Some(Value::Array(list)) => list,
        Some(_) => {
            errors.push("items", "must be an array");
            return None;
        }
    };
    if list.is_empty() {
        errors.push("items", "must contain at least one item");
        return None;
    }

    // Validate every item even after one fails, so all errors are reported.
    let parsed: Vec<Option<LineItem>> = list
        .iter()
        .enumerate()
        .map(|(i, item)| line_item(item, &format!("items[{i}]"), errors))
        .collect();
    parsed.into_iter().collect()
}

fn line_item(value: &Value, path: &str, errors: &mut ValidationErrors) -> Option<LineItem> {
    let obj = object(Some(value), path, errors)?;

    let id = required_text(obj.get("id"), &format!("{path}.id"), errors);
    let name = required_text(obj.get("name"), &format!("{path}.name"), errors);
    let quantity = quantity(obj.get("quantity"), &format!("{path}.quantity"), errors);
    let weight = positive(obj.get("weight"), &format!("{path}.weight"), errors);
    let dimensions = dimensions(obj.get("dimensions"), &format!("{path}.dimensions"), errors);
    let price = amount(obj.get("price"), &format!("{path}.price"), errors);

    let class_path = format!("{path}.shippingClass");
    let shipping_class = match present(obj.get("shippingClass")) {
        None => Some(None),
        Some(_) => text(obj.get("shippingClass"), &class_path, errors).and_then(|s| {
            s.parse::<ShippingClass>()
                .map(Some)
                .map_err(|_| errors.push(&class_path, "must be one of standard, oversized, freight"))
                .ok()
        }),
    };

    Some(LineItem {
        id: id?,
        name: name?,
        quantity: quantity?,
        weight: weight?,
        dimensions: dimensions?,
        price: price?,
        shipping_class: shipping_class?,
    })
}

fn dimensions(value: Option<&Value>, path: &str, errors: &mut ValidationErrors) -> Option<Dimensions> {
    let obj = object(value, path, errors)?;
    let length = positive(obj.get("length"), &format!("{path}.length"), errors);
    let width = positive(obj.get("width"), &format!("{path}.width"), errors);
    let height = positive(obj.get("height"), &format!("{path}.height"), errors);

    Some(Dimensions {
        length: length?,
        width: width?,
        height: height?,
    })
}

fn contact(value: Option<&Value>, errors: &mut ValidationErrors) -> Option<Contact> {
    let obj = object(value, "contact", errors)?;
    let name = required_text(obj.get("name"), "contact.name", errors);
    let email = text(obj.get("email"), "contact.email", errors).and_then(|s| {
        Email::parse(s)
            .map_err(|e| errors.push("contact.email", e.to_string()))
            .ok()
    });
    let phone = required_text(obj.get("phone"), "contact.phone", errors);

    Some(Contact {
        name: name?,
        email: email?,
        phone: phone?,
    })
}
