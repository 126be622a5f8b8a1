//! Delivery address.

use serde::{Deserialize, Serialize};

use super::{Postcode, StateCode};

/// Country recorded when a request omits it. Only domestic delivery is offered.
pub const DEFAULT_COUNTRY: &str = "Australia";

/// A validated Australian delivery address.
///
/// Construct through the request validator; the field types already enforce
/// the state enum and four-digit postcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    /// Suburb or town.
    pub city: String,
    pub state: StateCode,
    pub postcode: Postcode,
    pub country: String,
}

impl Address {
    /// One-line label, e.g. `12 Smith St, Fitzroy VIC 3065`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{}, {} {} {}",
            self.street, self.city, self.state, self.postcode
        )
    }
}
