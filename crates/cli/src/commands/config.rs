//! Configuration check command.
//!
//! Loads the storefront configuration exactly as the server does and prints a
//! summary without revealing the API key.

use fitout_storefront::config::{ConfigError, StorefrontConfig};

/// Summary lines for a loaded configuration.
#[must_use]
pub fn summary(config: &StorefrontConfig) -> Vec<String> {
    let quote_source = if config.primary_configured() {
        "BigPost, flat-rate fallback"
    } else if config.shipping.bigpost_enabled {
        "flat-rate only (BigPost enabled but BIGPOST_API_KEY missing)"
    } else {
        "flat-rate only (BigPost disabled)"
    };

    let mut lines = vec![
        format!("listen:        {}", config.socket_addr()),
        format!("quote source:  {quote_source}"),
        format!("origin state:  {}", config.shipping.origin),
        format!("timeout:       {} ms", config.shipping.primary_timeout.as_millis()),
    ];
    if let Some(bigpost) = &config.bigpost {
        lines.push(format!("bigpost url:   {}", bigpost.base_url));
    }
    lines.push(format!(
        "cors origins:  {}",
        if config.allowed_origins.is_empty() {
            "(same-origin only)".to_string()
        } else {
            config.allowed_origins.join(", ")
        }
    ));
    lines.push(format!(
        "sentry:        {}",
        if config.sentry.dsn.is_some() { "on" } else { "off" }
    ));
    lines
}

/// Load configuration from the environment and print its summary.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn check() -> Result<(), ConfigError> {
    let config = StorefrontConfig::from_env()?;

    #[allow(clippy::print_stdout)]
    {
        for line in summary(&config) {
            println!("{line}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_for_defaults() {
        let lines = summary(&StorefrontConfig::default());
        assert!(lines[0].ends_with("127.0.0.1:3000"));
        assert!(lines.iter().any(|l| l.contains("BigPost disabled")));
        assert!(lines.iter().any(|l| l.contains("origin state:  VIC")));
        assert!(!lines.iter().any(|l| l.starts_with("bigpost url")));
    }

    #[test]
    fn test_summary_flags_missing_key() {
        let mut config = StorefrontConfig::default();
        config.shipping.bigpost_enabled = true;
        let lines = summary(&config);
        assert!(lines.iter().any(|l| l.contains("BIGPOST_API_KEY missing")));
    }
}
