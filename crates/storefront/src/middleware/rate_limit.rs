//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Each quote can fan out to a paid carrier API call, so the shipping API is
//! limited per client IP.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Key used when no client address can be determined.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that prefers proxy headers, then the socket peer address.
///
/// Order: `CF-Connecting-IP`, first `X-Forwarded-For` hop, `X-Real-IP`, the
/// connection's peer address. Requests with none of these share one bucket.
#[derive(Clone, Copy, Debug)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();
        let header_ip = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        };

        let ip = header_ip("cf-connecting-ip")
            .or_else(|| header_ip("x-forwarded-for"))
            .or_else(|| header_ip("x-real-ip"))
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .unwrap_or(UNKNOWN_CLIENT);

        Ok(ip)
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for the shipping API: burst of 30, then 1 request per
/// second per IP.
///
/// # Panics
///
/// This function will not panic. `per_second(1)` and `burst_size(30)` are
/// always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn shipping_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(1)
        .burst_size(30)
        .finish()
        .expect("rate limiter config with per_second(1) and burst_size(30) is valid");
    GovernorLayer::new(Arc::new(config))
}
