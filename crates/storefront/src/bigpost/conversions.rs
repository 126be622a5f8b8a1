//! Conversions between core domain types and BigPost wire types.

use fitout_core::{
    Address, Booking, BookingRequest, CurrencyCode, LineItem, Price, Quote, QuoteOrigin,
    QuoteRequest, ShipmentStatus, ShippingClass,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use super::WAREHOUSE;
use super::types::{
    BookJobPayload, BookedJob, BuyerContact, CarrierQuote, Item, ItemType, JobStatusObject,
    JobType, Locality, Location, QuotePayload,
};

/// Transit estimate used when a carrier omits one.
const DEFAULT_TRANSIT_DAYS: u32 = 5;

/// Status reported for a booking BigPost accepted without a status string.
const DEFAULT_BOOKED_STATUS: &str = "Booked";

fn pickup_location() -> Location {
    Location {
        name: WAREHOUSE.name.to_string(),
        address: WAREHOUSE.street.to_string(),
        address_line_two: String::new(),
        locality: Locality {
            suburb: WAREHOUSE.suburb.to_string(),
            postcode: WAREHOUSE.postcode.to_string(),
            state: WAREHOUSE.state.code().to_string(),
        },
    }
}

fn buyer_location(address: &Address, name: &str) -> Location {
    Location {
        name: name.to_string(),
        address: address.street.clone(),
        address_line_two: String::new(),
        locality: Locality {
            suburb: address.city.clone(),
            postcode: address.postcode.to_string(),
            state: address.state.code().to_string(),
        },
    }
}

impl From<&LineItem> for Item {
    fn from(item: &LineItem) -> Self {
        let (item_type, consolidatable) = match item.class() {
            ShippingClass::Standard => (ItemType::Carton, true),
            ShippingClass::Oversized => (ItemType::Skid, false),
            ShippingClass::Freight => (ItemType::Pallet, false),
        };

        Self {
            item_type,
            description: item.name.clone(),
            quantity: item.quantity,
            height: item.dimensions.height,
            width: item.dimensions.width,
            length: item.dimensions.length,
            weight: item.weight,
            consolidatable,
        }
    }
}

/// Build the `getquote` body. Remote destinations allow depot collection.
pub(super) fn quote_payload(request: &QuoteRequest, buyer_name: &str) -> QuotePayload {
    let address = &request.delivery_address;
    let job_type = if address.state.is_remote() {
        JobType::Hybrid
    } else {
        JobType::DirectDelivery
    };

    QuotePayload {
        job_type,
        buyer_is_business: false,
        return_authority_to_leave: false,
        pickup_location: pickup_location(),
        buyer_location: buyer_location(address, buyer_name),
        items: request.items.iter().map(Item::from).collect(),
    }
}

/// Build the `bookjob` body.
pub(super) fn book_payload(request: &BookingRequest) -> BookJobPayload {
    BookJobPayload {
        quote: quote_payload(&request.consignment, &request.contact.name),
        carrier_id: request.carrier_id,
        service_code: request.service_code.clone(),
        buyer_contact: BuyerContact {
            name: request.contact.name.clone(),
            email: request.contact.email.to_string(),
            phone: request.contact.phone.clone(),
        },
        reference: request.reference.clone(),
        declared_value: request.consignment.total_value.to_f64().unwrap_or_default(),
    }
}

impl CarrierQuote {
    /// Convert to a domain quote, or `None` when the price is unusable.
    pub(super) fn into_quote(self) -> Option<Quote> {
        if !self.total.is_finite() {
            return None;
        }
        let price = Price::new(Decimal::from_f64(self.total)?, CurrencyCode::AUD).round_to_cents();
        if !price.is_positive() {
            return None;
        }

        let delivery_days = self
            .estimated_delivery_days
            .and_then(|days| u32::try_from(days).ok())
            .unwrap_or(DEFAULT_TRANSIT_DAYS);
        let service_name = self
            .service_name
            .unwrap_or_else(|| self.service_code.clone());
        let description = self
            .service_description
            .unwrap_or_else(|| format!("{} {}", self.carrier_name, service_name));

        Some(Quote {
            service_name,
            price: price.amount,
            delivery_days,
            carrier_name: self.carrier_name,
            description,
            restrictions: self.restrictions,
            origin: QuoteOrigin::Primary,
            carrier_id: Some(self.carrier_id),
            service_code: Some(self.service_code),
        })
    }
}

impl From<BookedJob> for Booking {
    fn from(job: BookedJob) -> Self {
        Self {
            job_id: job.job_id,
            carrier_name: job.carrier_name,
            tracking_number: job.tracking_number,
            status: job
                .status
                .unwrap_or_else(|| DEFAULT_BOOKED_STATUS.to_string()),
        }
    }
}

impl From<JobStatusObject> for ShipmentStatus {
    fn from(job: JobStatusObject) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            tracking_number: job.tracking_number,
            updated_at: job.last_updated,
        }
    }
}
