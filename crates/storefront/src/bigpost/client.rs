//! BigPost HTTP client.

use std::sync::Arc;

use fitout_core::{Booking, BookingRequest, Quote, QuoteRequest, ShipmentStatus};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::config::BigPostConfig;

use super::BigPostError;
use super::conversions::{book_payload, quote_payload};
use super::types::{ApiEnvelope, BookedJob, JobStatusObject, QuoteListObject};

/// Name sent as the buyer on quote requests, before a customer is known.
const QUOTE_BUYER_NAME: &str = "Customer";

/// BigPost API client.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Clone)]
pub struct BigPostClient {
    inner: Arc<BigPostClientInner>,
}

struct BigPostClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BigPostClient {
    /// Create a new BigPost client.
    ///
    /// The configured timeout applies to every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &BigPostConfig) -> Result<Self, BigPostError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut token = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| BigPostError::Config(format!("Invalid access token format: {e}")))?;
        token.set_sensitive(true);
        headers.insert("AccessToken", token);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(BigPostClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Request priced carrier services for a consignment.
    ///
    /// Services with an unusable price are dropped, so the result may be
    /// empty even when BigPost reports success.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, a non-success HTTP
    /// status, `Success: false`, or an unparseable body.
    #[instrument(skip_all, fields(state = %request.delivery_address.state, items = request.items.len()))]
    pub async fn get_quotes(&self, request: &QuoteRequest) -> Result<Vec<Quote>, BigPostError> {
        let payload = quote_payload(request, QUOTE_BUYER_NAME);
        let object: QuoteListObject = self.post("api/getquote", &payload).await?;

        let offered = object.quote_list.len();
        let quotes: Vec<Quote> = object
            .quote_list
            .into_iter()
            .filter_map(super::types::CarrierQuote::into_quote)
            .collect();

        if quotes.len() < offered {
            tracing::debug!(
                offered,
                usable = quotes.len(),
                "Dropped BigPost quotes with unusable prices"
            );
        }

        Ok(quotes)
    }

    /// Book a carrier service for a consignment.
    ///
    /// # Errors
    ///
    /// Returns an error if BigPost is unreachable or rejects the booking.
    #[instrument(skip_all, fields(carrier_id = request.carrier_id, reference = %request.reference))]
    pub async fn book_job(&self, request: &BookingRequest) -> Result<Booking, BigPostError> {
        let payload = book_payload(request);
        let job: BookedJob = self.post("api/bookjob", &payload).await?;
        tracing::info!(job_id = job.job_id, carrier = %job.carrier_name, "BigPost job booked");
        Ok(job.into())
    }

    /// Fetch the latest status of a booked job.
    ///
    /// # Errors
    ///
    /// Returns [`BigPostError::NotFound`] for an unknown job, or any transport
    /// or API error.
    #[instrument(skip(self))]
    pub async fn fetch_job_status(&self, job_id: i64) -> Result<ShipmentStatus, BigPostError> {
        let mut url = self.endpoint("api/jobstatus")?;
        url.query_pairs_mut()
            .append_pair("jobId", &job_id.to_string());

        let response = self
            .inner
            .client
            .get(url)
            .send()
            .await
            .map_err(BigPostError::from_transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BigPostError::NotFound(format!("job {job_id}")));
        }

        let job: JobStatusObject = Self::unwrap_envelope(response).await?;
        Ok(job.into())
    }

    fn endpoint(&self, path: &str) -> Result<Url, BigPostError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| BigPostError::Config(format!("Invalid endpoint {path}: {e}")))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, BigPostError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .inner
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(BigPostError::from_transport)?;

        Self::unwrap_envelope(response).await
    }

    /// Check the HTTP status and the `Success` flag, then return `Object`.
    async fn unwrap_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BigPostError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BigPostError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(BigPostError::from_transport)?;
        parse_envelope(&body)
    }
}

/// Parse a BigPost envelope body into its `Object`.
fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, BigPostError> {
    let envelope: ApiEnvelope<T> =
        serde_json::from_str(body).map_err(|e| BigPostError::Parse(e.to_string()))?;

    if !envelope.success {
        return Err(BigPostError::Rejected(
            envelope
                .error_message
                .unwrap_or_else(|| "no error message provided".to_string()),
        ));
    }

    envelope
        .object
        .ok_or_else(|| BigPostError::Parse("successful response without Object".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;

    fn config(key: &str) -> BigPostConfig {
        BigPostConfig {
            base_url: Url::parse("https://api.bigpost.com.au").unwrap(),
            api_key: SecretString::from(key),
            timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_new_rejects_header_unsafe_token() {
        let result = BigPostClient::new(&config("bad\ntoken"));
        assert!(matches!(result, Err(BigPostError::Config(_))));
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = BigPostClient::new(&config("b7Q2kF9xLm4RzT8wVn3c")).unwrap();
        assert_eq!(
            client.endpoint("api/getquote").unwrap().as_str(),
            "https://api.bigpost.com.au/api/getquote"
        );
    }

    #[test]
    fn test_parse_envelope_rejected() {
        let err = parse_envelope::<QuoteListObject>(
            r#"{"Success": false, "ErrorMessage": "Suburb/postcode mismatch"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, BigPostError::Rejected(msg) if msg == "Suburb/postcode mismatch"));
    }

    #[test]
    fn test_parse_envelope_missing_object() {
        let err = parse_envelope::<QuoteListObject>(r#"{"Success": true}"#).unwrap_err();
        assert!(matches!(err, BigPostError::Parse(_)));
    }

    #[test]
    fn test_parse_envelope_garbage() {
        let err = parse_envelope::<QuoteListObject>("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, BigPostError::Parse(_)));
    }

    #[test]
    fn test_parse_envelope_empty_quote_list() {
        let object =
            parse_envelope::<QuoteListObject>(r#"{"Success": true, "Object": {"QuoteList": []}}"#)
                .unwrap();
        assert!(object.quote_list.is_empty());
    }
}
