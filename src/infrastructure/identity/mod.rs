//! Identity provider implementations.

pub mod header;

pub use header::HeaderIdentityProvider;
