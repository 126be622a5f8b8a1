//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_ALLOWED_ORIGINS` - Comma-separated CORS origins for the checkout front end
//! - `SHIPPING_BIGPOST_ENABLED` - Use BigPost for live quotes (default: false)
//! - `BIGPOST_API_KEY` - BigPost access token (live quotes are skipped without it)
//! - `BIGPOST_API_URL` - BigPost API base URL (default: <https://api.bigpost.com.au>)
//! - `BIGPOST_TIMEOUT_MS` - Upper bound for one BigPost call (default: 8000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for human-readable

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use fitout_core::StateCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::bigpost::WAREHOUSE;

const DEFAULT_BIGPOST_URL: &str = "https://api.bigpost.com.au";
const DEFAULT_BIGPOST_TIMEOUT_MS: u64 = 8_000;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origins allowed to call the shipping API from a browser
    pub allowed_origins: Vec<String>,
    /// Shipping quote policy
    pub shipping: ShippingConfig,
    /// BigPost API configuration, present only when an API key is set
    pub bigpost: Option<BigPostConfig>,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
}

impl Default for StorefrontConfig {
    /// Local defaults: loopback on port 3000, live quotes off.
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            allowed_origins: Vec::new(),
            shipping: ShippingConfig::default(),
            bigpost: None,
            sentry: SentryConfig::default(),
            json_logs: false,
        }
    }
}

/// Shipping quote policy.
#[derive(Debug, Clone)]
pub struct ShippingConfig {
    /// Feature flag for live carrier quotes.
    pub bigpost_enabled: bool,
    /// Upper bound for a single BigPost call.
    pub primary_timeout: Duration,
    /// State the warehouse dispatches from.
    pub origin: StateCode,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            bigpost_enabled: false,
            primary_timeout: Duration::from_millis(DEFAULT_BIGPOST_TIMEOUT_MS),
            origin: WAREHOUSE.state,
        }
    }
}

/// BigPost API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct BigPostConfig {
    /// API base URL, without a trailing path
    pub base_url: Url,
    /// Access token sent in the `AccessToken` header
    pub api_key: SecretString,
    /// Request timeout applied by the HTTP client
    pub timeout: Duration,
}

impl std::fmt::Debug for BigPostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BigPostConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    /// Sentry DSN; error tracking is off when absent
    pub dsn: Option<String>,
    /// Environment tag (e.g. production, staging)
    pub environment: Option<String>,
    /// Fraction of error events to send
    pub sample_rate: f32,
    /// Fraction of transactions to trace
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the BigPost API key
    /// looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let allowed_origins = get_optional_env("STOREFRONT_ALLOWED_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        let timeout_ms: u64 = parse_env(
            "BIGPOST_TIMEOUT_MS",
            &DEFAULT_BIGPOST_TIMEOUT_MS.to_string(),
        )?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "BIGPOST_TIMEOUT_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let timeout = Duration::from_millis(timeout_ms);

        let shipping = ShippingConfig {
            bigpost_enabled: get_flag("SHIPPING_BIGPOST_ENABLED")?,
            primary_timeout: timeout,
            ..ShippingConfig::default()
        };
        let bigpost = BigPostConfig::from_env(timeout)?;

        Ok(Self {
            host,
            port,
            allowed_origins,
            shipping,
            bigpost,
            sentry: SentryConfig::from_env()?,
            json_logs: get_optional_env("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether live quotes will be attempted at all.
    #[must_use]
    pub const fn primary_configured(&self) -> bool {
        self.shipping.bigpost_enabled && self.bigpost.is_some()
    }
}

impl BigPostConfig {
    /// Returns `None` when no API key is set; live quotes are then skipped.
    fn from_env(timeout: Duration) -> Result<Option<Self>, ConfigError> {
        let Some(api_key) = get_optional_env("BIGPOST_API_KEY").filter(|k| !k.trim().is_empty())
        else {
            return Ok(None);
        };
        validate_secret_strength(&api_key, "BIGPOST_API_KEY")?;

        let raw_url = get_env_or_default("BIGPOST_API_URL", DEFAULT_BIGPOST_URL);
        let base_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("BIGPOST_API_URL".to_string(), e.to_string())
        })?;

        Ok(Some(Self {
            base_url,
            api_key: SecretString::from(api_key),
            timeout,
        }))
    }
}

impl SentryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default string.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Read a boolean feature flag; unset means off.
fn get_flag(key: &str) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(false), |raw| parse_flag(key, &raw))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected true/false, got '{other}'"),
        )),
    }
}

/// Split a comma-separated list, dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the token from the BigPost portal."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-bigpost-token", "BIGPOST_API_KEY");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "BIGPOST_API_KEY");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_token_like() {
        let result = validate_secret_strength("b7Q2kF9xLm4RzT8wVn3c", "BIGPOST_API_KEY");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("F", "true").unwrap());
        assert!(parse_flag("F", " ON ").unwrap());
        assert!(parse_flag("F", "1").unwrap());
        assert!(!parse_flag("F", "false").unwrap());
        assert!(!parse_flag("F", "").unwrap());
        assert!(matches!(
            parse_flag("F", "maybe"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("https://fitout.com.au, ,http://localhost:3001"),
            vec!["https://fitout.com.au", "http://localhost:3001"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_shipping_defaults_dispatch_from_warehouse() {
        let shipping = ShippingConfig::default();
        assert!(!shipping.bigpost_enabled);
        assert_eq!(shipping.origin, StateCode::Vic);
        assert_eq!(shipping.primary_timeout, Duration::from_secs(8));
    }

    #[test]
    fn test_primary_configured_needs_flag_and_key() {
        let mut config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            allowed_origins: Vec::new(),
            shipping: ShippingConfig::default(),
            bigpost: Some(BigPostConfig {
                base_url: Url::parse(DEFAULT_BIGPOST_URL).unwrap(),
                api_key: SecretString::from("b7Q2kF9xLm4RzT8wVn3c"),
                timeout: Duration::from_secs(8),
            }),
            sentry: SentryConfig::default(),
            json_logs: false,
        };
        assert!(!config.primary_configured());

        config.shipping.bigpost_enabled = true;
        assert!(config.primary_configured());

        config.bigpost = None;
        assert!(!config.primary_configured());

        assert_eq!(config.socket_addr().port(), 3000);
    }

    #[test]
    fn test_bigpost_config_debug_redacts_key() {
        let config = BigPostConfig {
            base_url: Url::parse(DEFAULT_BIGPOST_URL).unwrap(),
            api_key: SecretString::from("super_secret_access_token"),
            timeout: Duration::from_secs(8),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("api.bigpost.com.au"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_access_token"));
        assert_eq!(config.api_key.expose_secret(), "super_secret_access_token");
    }
}
