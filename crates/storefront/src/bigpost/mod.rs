//! BigPost carrier aggregator API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTPS via `reqwest`; the access token goes in the
//!   `AccessToken` header on every call
//! - One attempt per call, no retries. Callers on the quote path treat any
//!   error as "no live quotes" and fall back to the flat-rate table
//! - Wire types in [`types`] mirror BigPost's PascalCase JSON; conversions
//!   to and from the core domain types live in `conversions`
//!
//! # Example
//!
//! ```rust,ignore
//! use fitout_storefront::bigpost::BigPostClient;
//!
//! let client = BigPostClient::new(&config)?;
//! let quotes = client.get_quotes(&request).await?;
//! ```

mod client;
mod conversions;
pub mod types;

pub use client::BigPostClient;

use fitout_core::StateCode;
use thiserror::Error;

/// The warehouse every consignment is picked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupLocation {
    pub name: &'static str,
    pub street: &'static str,
    pub suburb: &'static str,
    pub postcode: &'static str,
    pub state: StateCode,
}

/// Melbourne dispatch warehouse.
pub const WAREHOUSE: PickupLocation = PickupLocation {
    name: "Fitout Dispatch",
    street: "120 Spencer St",
    suburb: "Melbourne",
    postcode: "3000",
    state: StateCode::Vic,
};

/// Errors that can occur when interacting with the BigPost API.
#[derive(Debug, Error)]
pub enum BigPostError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The call did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// BigPost answered with a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// BigPost answered 200 but flagged the call as unsuccessful.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The requested job does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The client could not be built from configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl BigPostError {
    /// Classify a transport error, separating timeouts from other failures.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bigpost_error_display() {
        let err = BigPostError::Api {
            status: 401,
            message: "Invalid access token".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 401 - Invalid access token");

        let err = BigPostError::Rejected("Postcode not serviced".to_string());
        assert_eq!(err.to_string(), "request rejected: Postcode not serviced");

        assert_eq!(BigPostError::Timeout.to_string(), "request timed out");
    }

    #[test]
    fn test_warehouse_is_in_victoria() {
        assert_eq!(WAREHOUSE.state, StateCode::Vic);
        assert_eq!(WAREHOUSE.postcode.len(), 4);
    }
}
