//! JSON API routes.

pub mod shipping;
