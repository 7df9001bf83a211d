//! Infrastructure layer: concrete collaborators behind the domain traits.
//!
//! - [`store`] - in-memory referral store
//! - [`identity`] - header-based identity provider
//! - [`shortlink`] - short-link vendor client

pub mod identity;
pub mod shortlink;
pub mod store;
