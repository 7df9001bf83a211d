//! Data Transfer Objects for request/response serialization.

pub mod health;
pub mod referral;

pub use health::{CheckStatus, HealthChecks, HealthResponse};
pub use referral::{CreateReferralQuery, ListReferralsQuery, ResolveReferralQuery};
