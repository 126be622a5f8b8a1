//! Fitout storefront shipping API.
//!
//! Serves shipping quotes for checkout on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON only
//! - BigPost for live carrier quotes, bookings and tracking
//! - Local flat-rate table whenever BigPost is off, unconfigured or failing
//!
//! No database: nothing here is persisted.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use fitout_storefront::AppState;
use fitout_storefront::config::StorefrontConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry.dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry
                .environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry.sample_rate,
            traces_sample_rate: config.sentry.traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter`, human or JSON output, and Sentry.
fn init_tracing(json_logs: bool) {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fitout_storefront=info,tower_http=debug".into());

    let fmt_layer = if json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.json_logs);

    if config.primary_configured() {
        tracing::info!(timeout = ?config.shipping.primary_timeout, "BigPost live quotes enabled");
    } else if config.shipping.bigpost_enabled {
        tracing::warn!("SHIPPING_BIGPOST_ENABLED is set but BIGPOST_API_KEY is missing; using flat rates");
    } else {
        tracing::info!("BigPost live quotes disabled; using flat rates");
    }

    let addr = config.socket_addr();
    let state = AppState::new(config).expect("Failed to initialize application state");
    let app = fitout_storefront::app(state);

    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
