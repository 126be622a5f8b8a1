//! Health check endpoints.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Readiness {
    pub ready: bool,
    /// Whether quotes will try BigPost before the flat-rate table.
    pub primary_configured: bool,
}

/// Readiness health check endpoint.
///
/// Always ready: the flat-rate fallback has no external dependencies.
pub async fn readiness(State(state): State<AppState>) -> Json<Readiness> {
    Json(Readiness {
        ready: true,
        primary_configured: state.carrier().is_some(),
    })
}
