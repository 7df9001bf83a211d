//! Short-link vendor integration.
//!
//! The engine talks to the vendor only through the [`LinkShortener`] trait;
//! [`ShortIoClient`] is the shipped HTTP implementation.

pub mod short_io;

pub use short_io::ShortIoClient;

use crate::error::AppError;
use async_trait::async_trait;

/// Converts a deep link into a vendor-shortened link.
///
/// A single call, no caching and no retries: vendor failures surface
/// immediately as [`AppError::Vendor`] or
/// [`AppError::MalformedVendorResponse`] and retry policy, if any, belongs to
/// the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkShortener: Send + Sync {
    async fn shorten(&self, deep_link_url: &str) -> Result<String, AppError>;
}
