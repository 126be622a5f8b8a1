//! Core types for Fitout shipping.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod booking;
pub mod email;
pub mod parcel;
pub mod postcode;
pub mod price;
pub mod quote;
pub mod state_code;

pub use address::{Address, DEFAULT_COUNTRY};
pub use booking::{Booking, BookingRequest, Contact, ShipmentStatus};
pub use email::{Email, EmailError};
pub use parcel::{Dimensions, LineItem, ShippingClass};
pub use postcode::{Postcode, PostcodeError};
pub use price::{CurrencyCode, Price};
pub use quote::{Quote, QuoteOrigin, QuoteRequest};
pub use state_code::{StateCode, StateCodeError};
