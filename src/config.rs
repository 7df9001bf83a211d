//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts.
//!
//! ## Required Variables
//!
//! - `SHORTLINK_API_URL` - vendor endpoint for short-link creation
//! - `SHORTLINK_API_KEY` - vendor API key (sent as `Authorization` header)
//! - `SHORTLINK_DOMAIN` - short domain registered with the vendor
//!
//! ## Optional Variables
//!
//! - `DEEP_LINK_BASE` - in-app URL the referral code is appended to
//!   (default: `app://referrals/onboarding`)
//! - `REFERRAL_TTL_DAYS` - referral link lifetime; `0` disables expiry
//!   (default: 30)
//! - `VENDOR_TIMEOUT_SECONDS` - outbound vendor call timeout (default: 10)
//! - `LISTEN` - bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - log level (default: `info`)
//! - `LOG_FORMAT` - log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use chrono::Duration;
use std::env;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub shortlink_api_url: String,
    pub shortlink_api_key: String,
    pub shortlink_domain: String,
    pub deep_link_base: String,
    /// Referral link lifetime in days. `0` disables expiry.
    pub referral_ttl_days: i64,
    pub vendor_timeout_seconds: u64,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required vendor configuration is missing.
    pub fn from_env() -> Result<Self> {
        let shortlink_api_url =
            env::var("SHORTLINK_API_URL").context("SHORTLINK_API_URL must be set")?;
        let shortlink_api_key =
            env::var("SHORTLINK_API_KEY").context("SHORTLINK_API_KEY must be set")?;
        let shortlink_domain =
            env::var("SHORTLINK_DOMAIN").context("SHORTLINK_DOMAIN must be set")?;

        let deep_link_base = env::var("DEEP_LINK_BASE")
            .unwrap_or_else(|_| "app://referrals/onboarding".to_string());

        let referral_ttl_days = env::var("REFERRAL_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let vendor_timeout_seconds = env::var("VENDOR_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            shortlink_api_url,
            shortlink_api_key,
            shortlink_domain,
            deep_link_base,
            referral_ttl_days,
            vendor_timeout_seconds,
            listen_addr,
            log_level,
            log_format,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range or malformed.
    pub fn validate(&self) -> Result<()> {
        if !self.shortlink_api_url.starts_with("http://")
            && !self.shortlink_api_url.starts_with("https://")
        {
            anyhow::bail!(
                "SHORTLINK_API_URL must start with 'http://' or 'https://', got '{}'",
                self.shortlink_api_url
            );
        }

        if self.shortlink_api_key.is_empty() {
            anyhow::bail!("SHORTLINK_API_KEY must not be empty");
        }

        if self.shortlink_domain.is_empty() {
            anyhow::bail!("SHORTLINK_DOMAIN must not be empty");
        }

        if self.deep_link_base.is_empty() || self.deep_link_base.contains('?') {
            anyhow::bail!(
                "DEEP_LINK_BASE must be a non-empty URL without a query string, got '{}'",
                self.deep_link_base
            );
        }

        if !(0..=3650).contains(&self.referral_ttl_days) {
            anyhow::bail!(
                "REFERRAL_TTL_DAYS must be between 0 and 3650, got {}",
                self.referral_ttl_days
            );
        }

        if self.vendor_timeout_seconds == 0 || self.vendor_timeout_seconds > 300 {
            anyhow::bail!(
                "VENDOR_TIMEOUT_SECONDS must be between 1 and 300, got {}",
                self.vendor_timeout_seconds
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        Ok(())
    }

    /// Lifetime applied to newly minted referral links, `None` if disabled.
    pub fn referral_ttl(&self) -> Option<Duration> {
        (self.referral_ttl_days > 0).then(|| Duration::days(self.referral_ttl_days))
    }

    /// Timeout for outbound vendor calls.
    pub fn vendor_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.vendor_timeout_seconds)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Vendor API: {}", self.shortlink_api_url);
        tracing::info!("  Vendor API key: {}", mask_secret(&self.shortlink_api_key));
        tracing::info!("  Short domain: {}", self.shortlink_domain);
        tracing::info!("  Deep link base: {}", self.deep_link_base);

        if let Some(ttl) = self.referral_ttl() {
            tracing::info!("  Referral TTL: {} days", ttl.num_days());
        } else {
            tracing::info!("  Referral TTL: disabled");
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks a secret for logging, keeping only a short prefix.
fn mask_secret(secret: &str) -> String {
    if secret.len() <= 4 {
        return "***".to_string();
    }

    format!("{}***", &secret[..4])
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
