//! Identity provider backed by gateway-asserted headers.

use crate::domain::identity::{AuthContext, AuthenticatedUser, IdentityProvider};
use crate::error::AppError;
use async_trait::async_trait;

/// Reads the authenticated user from `X-User-Id` / `X-Referral-Code` headers.
///
/// The service sits behind a gateway that performs the actual authentication
/// and forwards the verified identity in these headers. Identity proofing is
/// out of scope here; this is only the read contract.
#[derive(Default)]
pub struct HeaderIdentityProvider;

impl HeaderIdentityProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IdentityProvider for HeaderIdentityProvider {
    async fn resolve(&self, ctx: &AuthContext) -> Result<Option<AuthenticatedUser>, AppError> {
        let user_id = match ctx.user_id.as_deref().map(str::parse::<i64>) {
            Some(Ok(id)) => id,
            // A missing or garbled id means no resolvable caller, not an error.
            Some(Err(_)) | None => return Ok(None),
        };

        let referral_code = match ctx.referral_code.as_deref() {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => return Ok(None),
        };

        Ok(Some(AuthenticatedUser {
            user_id,
            referral_code,
        }))
    }
}
