//! BigPost API wire types.
//!
//! Field names follow BigPost's PascalCase JSON. Only the fields this service
//! reads or writes are modelled; unknown response fields are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response envelope shared by every BigPost endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    pub object: Option<T>,
}

/// Suburb/postcode/state triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Locality {
    pub suburb: String,
    pub postcode: String,
    pub state: String,
}

/// A pickup or delivery location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Location {
    pub name: String,
    pub address: String,
    pub address_line_two: String,
    pub locality: Locality,
}

/// Packaging type as BigPost understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemType {
    Carton,
    Skid,
    Pallet,
}

/// One line of a consignment. Dimensions in cm, weight in kg.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    pub item_type: ItemType,
    pub description: String,
    pub quantity: u32,
    pub height: f64,
    pub width: f64,
    pub length: f64,
    pub weight: f64,
    /// Whether the carrier may stack this line with others.
    pub consolidatable: bool,
}

/// Body of `POST /api/getquote`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuotePayload {
    pub job_type: JobType,
    pub buyer_is_business: bool,
    pub return_authority_to_leave: bool,
    pub pickup_location: Location,
    pub buyer_location: Location,
    pub items: Vec<Item>,
}

/// Delivery arrangement requested from the carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobType {
    /// Carrier delivers to the door.
    DirectDelivery,
    /// Carrier picks from the most suitable option, including depot collection.
    Hybrid,
}

/// `Object` of a successful quote response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuoteListObject {
    #[serde(default)]
    pub quote_list: Vec<CarrierQuote>,
}

/// One priced carrier service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CarrierQuote {
    pub carrier_id: i64,
    pub carrier_name: String,
    pub service_code: String,
    #[serde(default)]
    pub service_name: Option<String>,
    /// Price including GST.
    pub total: f64,
    #[serde(default)]
    pub estimated_delivery_days: Option<i64>,
    #[serde(default)]
    pub service_description: Option<String>,
    #[serde(default)]
    pub restrictions: Vec<String>,
}

/// Booking contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuyerContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Body of `POST /api/bookjob`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookJobPayload {
    #[serde(flatten)]
    pub quote: QuotePayload,
    pub carrier_id: i64,
    pub service_code: String,
    pub buyer_contact: BuyerContact,
    pub reference: String,
    /// Declared consignment value in AUD for transit insurance.
    pub declared_value: f64,
}

/// `Object` of a successful booking response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookedJob {
    pub job_id: i64,
    pub carrier_name: String,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `Object` of a job status response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobStatusObject {
    pub job_id: i64,
    pub status: String,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_response_deserialization() {
        let json = r#"{
            "Success": true,
            "ErrorMessage": null,
            "Object": {
                "QuoteList": [
                    {
                        "CarrierId": 7,
                        "CarrierName": "Hunter Express",
                        "ServiceCode": "HX-GEN",
                        "ServiceName": "General",
                        "Total": 112.4,
                        "EstimatedDeliveryDays": 4,
                        "SomethingNew": "ignored"
                    }
                ]
            }
        }"#;

        let envelope: ApiEnvelope<QuoteListObject> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        let quotes = envelope.object.unwrap().quote_list;
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].carrier_id, 7);
        assert_eq!(quotes[0].estimated_delivery_days, Some(4));
        assert!(quotes[0].restrictions.is_empty());
    }

    #[test]
    fn test_failed_envelope_without_object() {
        let json = r#"{"Success": false, "ErrorMessage": "Invalid postcode"}"#;
        let envelope: ApiEnvelope<QuoteListObject> = serde_json::from_str(json).unwrap();
        assert!(!envelope.success);
        assert!(envelope.object.is_none());
        assert_eq!(envelope.error_message.as_deref(), Some("Invalid postcode"));
    }

    #[test]
    fn test_job_status_deserialization() {
        let json = r#"{
            "Success": true,
            "Object": {
                "JobId": 90210,
                "Status": "In Transit",
                "TrackingNumber": "HX123",
                "LastUpdated": "2026-03-02T04:05:06Z"
            }
        }"#;
        let envelope: ApiEnvelope<JobStatusObject> = serde_json::from_str(json).unwrap();
        let job = envelope.object.unwrap();
        assert_eq!(job.status, "In Transit");
        assert!(job.last_updated.is_some());
    }

    #[test]
    fn test_book_payload_flattens_quote() {
        let payload = BookJobPayload {
            quote: QuotePayload {
                job_type: JobType::DirectDelivery,
                buyer_is_business: false,
                return_authority_to_leave: false,
                pickup_location: Location {
                    name: "A".to_string(),
                    address: "1 St".to_string(),
                    address_line_two: String::new(),
                    locality: Locality {
                        suburb: "Melbourne".to_string(),
                        postcode: "3000".to_string(),
                        state: "VIC".to_string(),
                    },
                },
                buyer_location: Location {
                    name: "B".to_string(),
                    address: "2 St".to_string(),
                    address_line_two: String::new(),
                    locality: Locality {
                        suburb: "Perth".to_string(),
                        postcode: "6000".to_string(),
                        state: "WA".to_string(),
                    },
                },
                items: Vec::new(),
            },
            carrier_id: 7,
            service_code: "HX-GEN".to_string(),
            buyer_contact: BuyerContact {
                name: "Sam".to_string(),
                email: "sam@example.com".to_string(),
                phone: "0400000000".to_string(),
            },
            reference: "ORD-1".to_string(),
            declared_value: 500.0,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["JobType"], "DirectDelivery");
        assert_eq!(json["BuyerLocation"]["Locality"]["State"], "WA");
        assert_eq!(json["CarrierId"], 7);
        assert!(json.get("Quote").is_none());
    }
}
