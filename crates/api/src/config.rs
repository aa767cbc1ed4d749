//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `BASKET_URL`, `CATALOG_URL`, `PAYMENT_URL` — upstream base URLs;
///   when all three are set the server talks HTTP, otherwise it runs
///   against seeded in-memory stores
/// - `UPSTREAM_TIMEOUT_MS` — per-call timeout for upstream requests
///   (default: `5000`)
/// - `DATABASE_URL` — Postgres connection string; orders live in memory
///   when unset
/// - `CLEAR_BASKET_AFTER_PAYMENT` — set to `"true"` to empty the basket
///   once payment succeeds (default: off)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub basket_url: Option<String>,
    pub catalog_url: Option<String>,
    pub payment_url: Option<String>,
    pub upstream_timeout: Duration,
    pub database_url: Option<String>,
    pub clear_basket_after_payment: bool,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            basket_url: std::env::var("BASKET_URL").ok(),
            catalog_url: std::env::var("CATALOG_URL").ok(),
            payment_url: std::env::var("PAYMENT_URL").ok(),
            upstream_timeout: Duration::from_millis(
                std::env::var("UPSTREAM_TIMEOUT_MS")
                    .ok()
                    .and_then(|ms| ms.parse().ok())
                    .unwrap_or(5000),
            ),
            database_url: std::env::var("DATABASE_URL").ok(),
            clear_basket_after_payment: std::env::var("CLEAR_BASKET_AFTER_PAYMENT")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the three upstream base URLs when all of them are
    /// configured.
    pub fn upstream_urls(&self) -> Option<(&str, &str, &str)> {
        match (&self.basket_url, &self.catalog_url, &self.payment_url) {
            (Some(basket), Some(catalog), Some(payment)) => {
                Some((basket.as_str(), catalog.as_str(), payment.as_str()))
            }
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            basket_url: None,
            catalog_url: None,
            payment_url: None,
            upstream_timeout: Duration::from_millis(5000),
            database_url: None,
            clear_basket_after_payment: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.upstream_timeout, Duration::from_millis(5000));
        assert!(config.database_url.is_none());
        assert!(!config.clear_basket_after_payment);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_upstream_urls_require_all_three() {
        let mut config = Config::default();
        assert!(config.upstream_urls().is_none());

        config.basket_url = Some("http://basket:8080".to_string());
        config.catalog_url = Some("http://catalog:8080".to_string());
        assert!(config.upstream_urls().is_none());

        config.payment_url = Some("http://payment:8080".to_string());
        assert!(config.upstream_urls().is_some());
    }
}
