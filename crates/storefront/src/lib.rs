//! Fitout storefront shipping API.
//!
//! Resolves shipping quotes from BigPost with a flat-rate fallback, and books
//! and tracks BigPost jobs. The crate is a library so the router can be
//! exercised in-process; `main.rs` only wires configuration and telemetry.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bigpost;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod shipping;
pub mod state;

pub use routes::app;
pub use state::AppState;
