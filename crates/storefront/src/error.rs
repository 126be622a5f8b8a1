//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before responding; clients get a JSON body of the form
//! `{ "success": false, "error": "...", "details": [...] }`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::bigpost::BigPostError;
use crate::shipping::{FieldError, ValidationErrors};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Carrier call failed outside the quote path.
    #[error("Carrier error: {0}")]
    Carrier(#[from] BigPostError),

    /// Live carrier features are switched off or unconfigured.
    #[error("Carrier unavailable")]
    CarrierUnavailable,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: Vec::new(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let mut errors = ValidationErrors::default();
        errors.push("body", rejection.body_text());
        Self::Validation(errors)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Carrier(BigPostError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Carrier(BigPostError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Carrier(_) => StatusCode::BAD_GATEWAY,
            Self::CarrierUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let body = match self {
            Self::Validation(errors) => ErrorBody {
                details: errors.into_iter().collect(),
                ..ErrorBody::new("Invalid request")
            },
            Self::Carrier(BigPostError::Rejected(message)) => {
                ErrorBody::new(format!("Carrier rejected the request: {message}"))
            }
            Self::Carrier(BigPostError::NotFound(what)) => {
                ErrorBody::new(format!("Not found: {what}"))
            }
            Self::Carrier(BigPostError::Config(_)) => ErrorBody::new("Internal server error"),
            Self::Carrier(_) => ErrorBody::new("Carrier service error"),
            Self::CarrierUnavailable => ErrorBody::new("Carrier booking is not available"),
            Self::BadRequest(message) => ErrorBody::new(message),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for a business event.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Carrier(BigPostError::NotFound("job 42".to_string()));
        assert_eq!(err.to_string(), "Carrier error: Not found: job 42");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::Validation(ValidationErrors::default())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::CarrierUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Carrier(BigPostError::Timeout)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Carrier(BigPostError::NotFound("job 1".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Carrier(BigPostError::Config("bad url".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_body_lists_details() {
        let mut errors = ValidationErrors::default();
        errors.push("deliveryAddress.postcode", "is required");
        errors.push("items", "must contain at least one item");

        let json = body_json(AppError::Validation(errors).into_response()).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid request");
        assert_eq!(json["details"][0]["path"], "deliveryAddress.postcode");
        assert_eq!(json["details"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_config_detail_is_hidden() {
        let err = AppError::Carrier(BigPostError::Config("client builder failed".to_string()));
        let json = body_json(err.into_response()).await;
        assert_eq!(json["error"], "Internal server error");
        assert!(json.get("details").is_none());
    }
}
