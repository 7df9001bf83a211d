//! Domain layer containing business entities and collaborator contracts.
//!
//! This layer has no dependency on infrastructure or the HTTP surface:
//!
//! - [`entities`] - referral data model
//! - [`store`] - referral persistence contract
//! - [`identity`] - external identity provider read contract
//!
//! The business rules themselves live in
//! [`crate::application::services::ReferralService`].

pub mod entities;
pub mod identity;
pub mod store;

pub use identity::{AuthContext, AuthenticatedUser, IdentityProvider};
pub use store::ReferralStore;

#[cfg(test)]
pub use identity::MockIdentityProvider;
#[cfg(test)]
pub use store::MockReferralStore;
