//! HTTP middleware stack for the shipping API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. Catch panic (JSON 500)
//! 3. `TraceLayer` (request span with `request_id` field)
//! 4. Request ID (fills the span field, echoes the header)
//! 5. CORS
//! 6. Security headers
//! 7. Rate limiting on `/api/shipping` (governor)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use rate_limit::{ClientIpKeyExtractor, shipping_rate_limiter};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
