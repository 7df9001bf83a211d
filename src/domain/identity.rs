//! Identity provider trait consumed by the referral engine.
//!
//! Identity proofing is external to this service: an upstream identity
//! system authenticates users and this trait only exposes its read contract.

use crate::error::AppError;
use async_trait::async_trait;

/// The authenticated user as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    /// Stable per-user code embedded in deep links.
    pub referral_code: String,
}

/// Raw caller credentials carried by an inbound request.
///
/// Extracted from request headers by the HTTP layer (see
/// [`crate::api::extract`]) and interpreted by an [`IdentityProvider`]; the
/// engine never reads headers itself.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user_id: Option<String>,
    pub referral_code: Option<String>,
}

/// Resolves the currently authenticated user from request credentials.
///
/// Returns `Ok(None)` when no user can be resolved; the engine turns that
/// into [`AppError::Unauthenticated`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, ctx: &AuthContext) -> Result<Option<AuthenticatedUser>, AppError>;
}
