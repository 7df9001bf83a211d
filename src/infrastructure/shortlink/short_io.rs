//! HTTP client for the short.io-style link shortening vendor.

use crate::error::AppError;
use crate::infrastructure::shortlink::LinkShortener;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use std::time::Duration;

/// Outbound request body expected by the vendor.
#[derive(Debug, Serialize)]
struct ShortenRequest<'a> {
    #[serde(rename = "originalURL")]
    original_url: &'a str,
    domain: &'a str,
}

/// Client for the short-link vendor API.
///
/// One instance is built at startup and reused for every call: it carries the
/// static `Authorization` header and the vendor timeout. No caching and no
/// connection handling beyond what `reqwest` gives for free.
pub struct ShortIoClient {
    client: reqwest::Client,
    api_url: String,
    domain: String,
}

impl ShortIoClient {
    /// Builds the vendor client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(api_url: &str, api_key: &str, domain: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(api_key).context("SHORTLINK_API_KEY is not a valid header value")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build vendor HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            domain: domain.to_string(),
        })
    }
}

#[async_trait]
impl LinkShortener for ShortIoClient {
    async fn shorten(&self, deep_link_url: &str) -> Result<String, AppError> {
        let request = ShortenRequest {
            original_url: deep_link_url,
            domain: &self.domain,
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Vendor request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::internal(format!("Vendor response read failed: {e}")))?;

        if !status.is_success() {
            return Err(AppError::vendor(status.as_u16(), body));
        }

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|_| AppError::malformed_vendor_response("Vendor response is not valid JSON"))?;

        match json.get("shortURL").and_then(|v| v.as_str()) {
            Some(short_url) => Ok(short_url.to_string()),
            None => Err(AppError::malformed_vendor_response(
                "Vendor response missing shortURL",
            )),
        }
    }
}
