//! Shipping API routes.
//!
//! JSON endpoints used by checkout: quote resolution, and booking and
//! tracking of BigPost jobs once an order is paid.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use fitout_core::{Booking, Quote, ShipmentStatus};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::shipping::validation::{validate_booking_request, validate_quote_request};
use crate::state::AppState;

/// Response from resolving shipping quotes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    pub quotes: Vec<Quote>,
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<&'static str>,
}

/// Response from booking a carrier job.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub booking: Booking,
}

/// Response from looking up a carrier job.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub success: bool,
    pub job: ShipmentStatus,
}

/// Resolve shipping quotes for a delivery address and cart.
///
/// Always answers with quotes for a valid request: live BigPost quotes when
/// available, flat-rate quotes otherwise.
#[instrument(skip_all)]
pub async fn quote(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let Json(body) = body?;
    let request = validate_quote_request(&body)?;

    let resolution = state.resolver().resolve(&request).await;
    tracing::info!(
        state = %request.delivery_address.state,
        quotes = resolution.quotes.len(),
        fallback_used = resolution.fallback_used,
        "Shipping quotes resolved"
    );

    Ok(Json(QuoteResponse {
        success: true,
        quotes: resolution.quotes,
        fallback_used: resolution.fallback_used,
        fallback_reason: resolution.fallback_reason.as_ref().map(|r| r.code()),
    }))
}

/// Book a carrier service chosen from a live quote.
///
/// Bookings are never made against flat-rate quotes, so this needs the live
/// carrier to be enabled and configured.
#[instrument(skip_all)]
pub async fn book(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>)> {
    let carrier = state.carrier().ok_or(AppError::CarrierUnavailable)?;
    let Json(body) = body?;
    let request = validate_booking_request(&body)?;

    let booking = carrier.book(&request).await?;

    let job_id = booking.job_id.to_string();
    add_breadcrumb(
        "shipping",
        "Carrier job booked",
        &[("job_id", job_id.as_str()), ("reference", request.reference.as_str())],
    );
    tracing::info!(job_id = booking.job_id, reference = %request.reference, "Shipment booked");

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            success: true,
            booking,
        }),
    ))
}

/// Look up the status of a booked job.
#[instrument(skip(state))]
pub async fn job_status(
    State(state): State<AppState>,
    job_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<JobStatusResponse>> {
    let Path(job_id) = job_id.map_err(|_| AppError::BadRequest("Invalid job id".to_string()))?;
    if job_id <= 0 {
        return Err(AppError::BadRequest("Invalid job id".to_string()));
    }
    let carrier = state.carrier().ok_or(AppError::CarrierUnavailable)?;

    let job = carrier.job_status(job_id).await?;

    Ok(Json(JobStatusResponse { success: true, job }))
}
