//! Integration tests for Fitout shipping.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process router tests with a scripted carrier (no network)
//! cargo test -p fitout-integration-tests
//!
//! # Live BigPost smoke tests
//! BIGPOST_API_KEY=... cargo test -p fitout-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `shipping_api` - Router tests: quote resolution, booking, job status
//! - `bigpost_client` - BigPost client against a local stub server
//! - `bigpost_live` - Real BigPost calls, ignored by default
//!
//! This library holds the shared harness: a scripted [`ShippingCarrier`] and a
//! [`TestApp`] wrapper that drives the router with `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header::CONTENT_TYPE};
use fitout_core::{Booking, BookingRequest, Quote, QuoteOrigin, QuoteRequest, ShipmentStatus};
use fitout_storefront::bigpost::BigPostError;
use fitout_storefront::config::StorefrontConfig;
use fitout_storefront::shipping::ShippingCarrier;
use fitout_storefront::{AppState, app};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Timeout used by [`TestApp::live`]; scripts that hang outlast it.
pub const TEST_PRIMARY_TIMEOUT: Duration = Duration::from_millis(100);

/// How the scripted carrier answers quote requests.
pub enum QuoteScript {
    Quotes(Vec<Quote>),
    Fail(fn() -> BigPostError),
    Hang,
}

/// A carrier that answers from a script and records what it was asked.
pub struct ScriptedCarrier {
    quote_script: QuoteScript,
    booking: Option<Booking>,
    jobs: Vec<ShipmentStatus>,
    quote_calls: AtomicUsize,
    booked: Mutex<Vec<BookingRequest>>,
}

impl ScriptedCarrier {
    #[must_use]
    pub fn new(quote_script: QuoteScript) -> Self {
        Self {
            quote_script,
            booking: None,
            jobs: Vec::new(),
            quote_calls: AtomicUsize::new(0),
            booked: Mutex::new(Vec::new()),
        }
    }

    /// Accept bookings with this confirmation.
    #[must_use]
    pub fn with_booking(mut self, booking: Booking) -> Self {
        self.booking = Some(booking);
        self
    }

    /// Know about this job.
    #[must_use]
    pub fn with_job(mut self, job: ShipmentStatus) -> Self {
        self.jobs.push(job);
        self
    }

    #[must_use]
    pub fn quote_calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn booked(&self) -> Vec<BookingRequest> {
        self.booked.lock().expect("booking log poisoned").clone()
    }
}

#[async_trait]
impl ShippingCarrier for ScriptedCarrier {
    async fn quote(&self, _request: &QuoteRequest) -> Result<Vec<Quote>, BigPostError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        match &self.quote_script {
            QuoteScript::Quotes(quotes) => Ok(quotes.clone()),
            QuoteScript::Fail(make) => Err(make()),
            QuoteScript::Hang => {
                tokio::time::sleep(TEST_PRIMARY_TIMEOUT * 50).await;
                Ok(Vec::new())
            }
        }
    }

    async fn book(&self, request: &BookingRequest) -> Result<Booking, BigPostError> {
        self.booked
            .lock()
            .expect("booking log poisoned")
            .push(request.clone());
        self.booking
            .clone()
            .ok_or_else(|| BigPostError::Rejected("Service not available".to_string()))
    }

    async fn job_status(&self, job_id: i64) -> Result<ShipmentStatus, BigPostError> {
        self.jobs
            .iter()
            .find(|job| job.job_id == job_id)
            .cloned()
            .ok_or_else(|| BigPostError::NotFound(format!("job {job_id}")))
    }
}

/// The storefront router plus the carrier behind it.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Live quotes switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            router: app(AppState::with_carrier(StorefrontConfig::default(), None)),
        }
    }

    /// Live quotes enabled but no API key configured.
    #[must_use]
    pub fn enabled_without_key() -> Self {
        let mut config = StorefrontConfig::default();
        config.shipping.bigpost_enabled = true;
        Self {
            router: app(AppState::with_carrier(config, None)),
        }
    }

    /// Live quotes enabled against a scripted carrier.
    #[must_use]
    pub fn live(carrier: Arc<ScriptedCarrier>) -> Self {
        let mut config = StorefrontConfig::default();
        config.shipping.bigpost_enabled = true;
        config.shipping.primary_timeout = TEST_PRIMARY_TIMEOUT;
        let carrier: Arc<dyn ShippingCarrier> = carrier;
        Self {
            router: app(AppState::with_carrier(config, Some(carrier))),
        }
    }

    /// POST a JSON body and return the status and JSON response.
    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    /// GET a path and return the status and JSON response.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// One 120 kg drawer system, 180 x 120 x 30 cm.
#[must_use]
pub fn quote_body(state: &str, postcode: &str) -> Value {
    json!({
        "deliveryAddress": {
            "street": "12 Example Rd",
            "city": "Testville",
            "state": state,
            "postcode": postcode,
            "country": "Australia"
        },
        "items": [{
            "id": "drawer-1200",
            "name": "Drawer System 1200",
            "quantity": 1,
            "weight": 120,
            "dimensions": { "length": 180, "width": 120, "height": 30 },
            "price": 2499.00
        }],
        "totalValue": 2499.00
    })
}

/// A quote body extended with the fields a booking needs.
#[must_use]
pub fn booking_body(state: &str, postcode: &str) -> Value {
    let mut body = quote_body(state, postcode);
    if let Value::Object(obj) = &mut body {
        obj.insert("carrierId".to_string(), json!(7));
        obj.insert("serviceCode".to_string(), json!("HX-GEN"));
        obj.insert(
            "contact".to_string(),
            json!({ "name": "Sam Driver", "email": "sam@example.com.au", "phone": "0400000000" }),
        );
        obj.insert("reference".to_string(), json!("ORD-2001"));
    }
    body
}

/// A bookable carrier quote.
#[must_use]
pub fn primary_quote(service: &str, price_cents: i64, days: u32) -> Quote {
    Quote {
        service_name: service.to_string(),
        price: Decimal::new(price_cents, 2),
        delivery_days: days,
        carrier_name: "Hunter Express".to_string(),
        description: format!("Hunter Express {service}"),
        restrictions: Vec::new(),
        origin: QuoteOrigin::Primary,
        carrier_id: Some(7),
        service_code: Some("HX-GEN".to_string()),
    }
}

/// Read the `price` of every quote in a quote response.
#[must_use]
pub fn prices(response: &Value) -> Vec<f64> {
    response["quotes"]
        .as_array()
        .map(|quotes| quotes.iter().filter_map(|q| q["price"].as_f64()).collect())
        .unwrap_or_default()
}
