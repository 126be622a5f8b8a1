//! Application state shared across handlers.

use std::sync::Arc;

use crate::bigpost::{BigPostClient, BigPostError};
use crate::config::StorefrontConfig;
use crate::shipping::{ShippingCarrier, ShippingResolver, ShippingSettings};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; read-only after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    resolver: ShippingResolver,
}

impl AppState {
    /// Create application state, building the BigPost client when an API key
    /// is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the BigPost client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, BigPostError> {
        let carrier = match &config.bigpost {
            Some(bigpost) => {
                let client: Arc<dyn ShippingCarrier> = Arc::new(BigPostClient::new(bigpost)?);
                Some(client)
            }
            None => None,
        };
        Ok(Self::with_carrier(config, carrier))
    }

    /// Create application state around an existing carrier.
    #[must_use]
    pub fn with_carrier(config: StorefrontConfig, carrier: Option<Arc<dyn ShippingCarrier>>) -> Self {
        let resolver = ShippingResolver::new(ShippingSettings::from(&config.shipping), carrier);
        Self {
            inner: Arc::new(AppStateInner { config, resolver }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shipping quote resolver.
    #[must_use]
    pub fn resolver(&self) -> &ShippingResolver {
        &self.inner.resolver
    }

    /// The live carrier, when enabled and configured.
    #[must_use]
    pub fn carrier(&self) -> Option<&Arc<dyn ShippingCarrier>> {
        self.inner.resolver.carrier()
    }
}
