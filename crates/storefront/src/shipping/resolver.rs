//! Chooses between live carrier quotes and the flat-rate table.

use std::sync::Arc;
use std::time::Duration;

use fitout_core::{Quote, QuoteRequest, StateCode};
use tracing::instrument;

use crate::config::ShippingConfig;

use super::{FailureReason, ShippingCarrier, fallback};

/// Resolver settings, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingSettings {
    /// Whether live carrier quotes may be requested at all.
    pub primary_enabled: bool,
    /// Upper bound on a single live quote call.
    pub primary_timeout: Duration,
    /// Dispatch state, for fallback zoning.
    pub origin: StateCode,
}

impl From<&ShippingConfig> for ShippingSettings {
    fn from(config: &ShippingConfig) -> Self {
        Self {
            primary_enabled: config.bigpost_enabled,
            primary_timeout: config.primary_timeout,
            origin: config.origin,
        }
    }
}

/// Outcome of a quote resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteResolution {
    pub quotes: Vec<Quote>,
    pub fallback_used: bool,
    /// Set exactly when `fallback_used` is true.
    pub fallback_reason: Option<FailureReason>,
}

/// Resolves a validated request into quotes.
///
/// Always produces at least one quote: live carrier quotes when they are
/// enabled, configured and non-empty, the flat-rate table otherwise.
#[derive(Clone)]
pub struct ShippingResolver {
    settings: ShippingSettings,
    carrier: Option<Arc<dyn ShippingCarrier>>,
}

impl ShippingResolver {
    /// Create a resolver. `carrier` is `None` when no API key is configured.
    #[must_use]
    pub fn new(settings: ShippingSettings, carrier: Option<Arc<dyn ShippingCarrier>>) -> Self {
        Self { settings, carrier }
    }

    #[must_use]
    pub const fn settings(&self) -> &ShippingSettings {
        &self.settings
    }

    /// The live carrier, if enabled and configured.
    #[must_use]
    pub fn carrier(&self) -> Option<&Arc<dyn ShippingCarrier>> {
        if self.settings.primary_enabled {
            self.carrier.as_ref()
        } else {
            None
        }
    }

    /// Resolve quotes for a request. Never fails.
    #[instrument(
        skip_all,
        fields(
            state = %request.delivery_address.state,
            units = request.unit_count(),
            weight_kg = request.total_weight(),
        )
    )]
    pub async fn resolve(&self, request: &QuoteRequest) -> QuoteResolution {
        match self.primary_quotes(request).await {
            Ok(quotes) => {
                if let Some(cheapest) = quotes.iter().min_by_key(|q| q.price) {
                    tracing::debug!(
                        count = quotes.len(),
                        cheapest = %cheapest.display_price(),
                        "Using live carrier quotes"
                    );
                }
                QuoteResolution {
                    quotes,
                    fallback_used: false,
                    fallback_reason: None,
                }
            }
            Err(reason) => {
                if reason.is_configured() {
                    tracing::debug!(reason = reason.code(), "Live carrier quotes not in use");
                } else {
                    tracing::warn!(
                        reason = reason.code(),
                        detail = %reason,
                        "Live carrier quotes failed, using flat-rate table"
                    );
                }
                QuoteResolution {
                    quotes: fallback::quote(request, self.settings.origin),
                    fallback_used: true,
                    fallback_reason: Some(reason),
                }
            }
        }
    }

    /// One bounded attempt at the live carrier.
    async fn primary_quotes(&self, request: &QuoteRequest) -> Result<Vec<Quote>, FailureReason> {
        if !self.settings.primary_enabled {
            return Err(FailureReason::Disabled);
        }
        let carrier = self.carrier.as_ref().ok_or(FailureReason::MissingApiKey)?;

        let quotes = tokio::time::timeout(self.settings.primary_timeout, carrier.quote(request))
            .await
            .map_err(|_| FailureReason::Timeout)??;

        if quotes.is_empty() {
            return Err(FailureReason::Empty);
        }
        Ok(quotes)
    }
}
