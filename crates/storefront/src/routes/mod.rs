//! HTTP route handlers for the shipping API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness + whether BigPost is in use
//!
//! # Shipping API (rate limited)
//! POST /api/shipping/quote         - Resolve quotes (BigPost or flat rate)
//! POST /api/shipping/book          - Book a BigPost job
//! GET  /api/shipping/jobs/{job_id} - BigPost job status
//! ```

pub mod api;
pub mod health;

use std::any::Any;

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ErrorBody;
use crate::middleware::{
    REQUEST_ID_HEADER, request_id_middleware, security_headers_middleware,
    shipping_rate_limiter,
};
use crate::state::AppState;

/// Create the shipping API router.
pub fn shipping_routes() -> Router<AppState> {
    Router::new()
        .route("/quote", post(api::shipping::quote))
        .route("/book", post(api::shipping::book))
        .route("/jobs/{job_id}", get(api::shipping::job_status))
        .layer(shipping_rate_limiter())
}

/// Build the complete application with middleware.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().allowed_origins);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/shipping", shipping_routes())
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(cors)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Span for one request; `request_id` is filled in by the request ID middleware.
fn request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}

/// Turn a handler panic into the standard JSON 500.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("Internal server error")),
    )
        .into_response()
}

/// CORS for the checkout front end. No origins configured means same-origin only.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::header::CONTENT_SECURITY_POLICY;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    fn test_app() -> Router {
        app(AppState::with_carrier(StorefrontConfig::default(), None))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Response) {
        let response = test_app().oneshot(request).await.unwrap();
        (response.status(), response)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn quote_body(postcode: &str) -> Value {
        json!({
            "deliveryAddress": {
                "street": "1 Hay St",
                "city": "Perth",
                "state": "WA",
                "postcode": postcode
            },
            "items": [{
                "id": "drawers",
                "name": "Drawer System",
                "quantity": 1,
                "weight": 120,
                "dimensions": { "length": 180, "width": 120, "height": 30 },
                "price": 2499
            }],
            "totalValue": 2499
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, response) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_readiness_reports_primary_off() {
        let (status, response) =
            send(Request::get("/health/ready").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["primaryConfigured"], false);
    }

    #[tokio::test]
    async fn test_quote_uses_fallback_when_disabled() {
        let (status, response) = send(post_json("/api/shipping/quote", &quote_body("6000"))).await;
        assert_eq!(status, StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["fallbackUsed"], true);
        assert_eq!(json["fallbackReason"], "disabled");
        let quotes = json["quotes"].as_array().unwrap();
        assert!(quotes.len() >= 2);
        for quote in quotes {
            assert_eq!(quote["origin"], "fallback");
            assert!(quote["price"].as_f64().unwrap() > 0.0);
        }
    }

    #[tokio::test]
    async fn test_short_postcode_is_rejected() {
        let (status, response) = send(post_json("/api/shipping/quote", &quote_body("600"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["details"][0]["path"], "deliveryAddress.postcode");
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/shipping/quote")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, response) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["details"][0]["path"], "body");
    }

    #[tokio::test]
    async fn test_booking_needs_live_carrier() {
        let (status, response) = send(post_json("/api/shipping/book", &json!({}))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["success"], false);

        let (status, _) = send(
            Request::get("/api/shipping/jobs/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_invalid_job_id() {
        let (status, _) = send(
            Request::get("/api/shipping/jobs/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_request_id_and_security_headers() {
        let request = Request::get("/health")
            .header(REQUEST_ID_HEADER, "checkout-123")
            .body(Body::empty())
            .unwrap();
        let (_, response) = send(request).await;
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "checkout-123");
        assert!(response.headers().contains_key(CONTENT_SECURITY_POLICY));

        let (_, response) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        let generated = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert_eq!(generated.len(), 36);
    }

    #[test]
    fn test_panic_response_is_json_500() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
