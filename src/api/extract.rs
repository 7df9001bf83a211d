//! Axum extractors for caller credentials.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::domain::identity::AuthContext;

/// Extracts [`AuthContext`] from the identity headers.
///
/// Never rejects: missing headers yield an empty context, and it is the
/// identity provider that decides whether the caller is resolvable.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        Ok(AuthContext {
            user_id: header("x-user-id"),
            referral_code: header("x-referral-code"),
        })
    }
}
