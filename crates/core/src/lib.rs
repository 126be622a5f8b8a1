//! Fitout Core - Shared shipping types library.
//!
//! This crate provides the domain types used across all Fitout components:
//! - `storefront` - Shipping API consumed by the storefront checkout
//! - `cli` - Command-line tools for offline quoting and configuration checks
//!
//! # Architecture
//!
//! The core crate contains only types and pure parsing - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for postcodes, state codes, prices, emails,
//!   addresses, line items and quotes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
