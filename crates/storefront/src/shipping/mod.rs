//! Shipping quote resolution.
//!
//! # Flow
//!
//! ```text
//! raw JSON ──► validation ──► QuoteRequest ──► ShippingResolver
//!                                                 │
//!                     flag off / no key ──────────┤
//!                     primary error / timeout ────┤──► fallback table
//!                     primary empty ──────────────┘
//!                     primary ≥ 1 quote ─────────────► primary quotes
//! ```
//!
//! The carrier sits behind [`ShippingCarrier`] so the resolver and routes can
//! be exercised without network access.

pub mod fallback;
mod resolver;
pub mod validation;

pub use resolver::{QuoteResolution, ShippingResolver, ShippingSettings};
pub use validation::{FieldError, ValidationErrors};

use async_trait::async_trait;
use fitout_core::{Booking, BookingRequest, Quote, QuoteRequest, ShipmentStatus};
use thiserror::Error;

use crate::bigpost::{BigPostClient, BigPostError};

/// A carrier that can price, book and track consignments.
#[async_trait]
pub trait ShippingCarrier: Send + Sync {
    /// Price a consignment. An empty list is a valid answer.
    async fn quote(&self, request: &QuoteRequest) -> Result<Vec<Quote>, BigPostError>;

    /// Book a previously quoted service.
    async fn book(&self, request: &BookingRequest) -> Result<Booking, BigPostError>;

    /// Look up a booked job.
    async fn job_status(&self, job_id: i64) -> Result<ShipmentStatus, BigPostError>;
}

#[async_trait]
impl ShippingCarrier for BigPostClient {
    async fn quote(&self, request: &QuoteRequest) -> Result<Vec<Quote>, BigPostError> {
        self.get_quotes(request).await
    }

    async fn book(&self, request: &BookingRequest) -> Result<Booking, BigPostError> {
        self.book_job(request).await
    }

    async fn job_status(&self, job_id: i64) -> Result<ShipmentStatus, BigPostError> {
        self.fetch_job_status(job_id).await
    }
}

/// Why live carrier quotes were not used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The live-quote feature flag is off.
    #[error("live carrier quotes are disabled")]
    Disabled,
    /// No carrier API key is configured.
    #[error("no carrier API key configured")]
    MissingApiKey,
    /// The carrier did not answer in time.
    #[error("carrier request timed out")]
    Timeout,
    /// Transport, HTTP or parse failure.
    #[error("carrier unavailable: {0}")]
    Unavailable(String),
    /// The carrier answered but flagged the request as unsuccessful.
    #[error("carrier rejected request: {0}")]
    Rejected(String),
    /// The carrier answered with no usable quotes.
    #[error("carrier returned no quotes")]
    Empty,
}

impl FailureReason {
    /// Stable machine-readable code, safe to show to API clients.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::MissingApiKey => "missing_api_key",
            Self::Timeout => "timeout",
            Self::Unavailable(_) => "unavailable",
            Self::Rejected(_) => "rejected",
            Self::Empty => "empty",
        }
    }

    /// Whether this reason is a deliberate configuration choice rather than
    /// an upstream fault.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self, Self::Disabled | Self::MissingApiKey)
    }
}

impl From<BigPostError> for FailureReason {
    fn from(err: BigPostError) -> Self {
        match err {
            BigPostError::Timeout => Self::Timeout,
            BigPostError::Rejected(message) => Self::Rejected(message),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
