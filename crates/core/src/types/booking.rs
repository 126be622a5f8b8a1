//! Shipment bookings with the carrier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, QuoteRequest};

/// Who the carrier contacts about the delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: Email,
    pub phone: String,
}

/// A request to book a carrier service previously returned as a primary quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(flatten)]
    pub consignment: QuoteRequest,
    pub carrier_id: i64,
    pub service_code: String,
    pub contact: Contact,
    /// Order reference printed on the consignment note.
    pub reference: String,
}

/// A confirmed carrier job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub job_id: i64,
    pub carrier_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub status: String,
}

/// Latest known state of a booked job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentStatus {
    pub job_id: i64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
