//! HTTP request handlers.

pub mod health;
pub mod referrals;

pub use health::health_handler;
pub use referrals::{create_referral_handler, list_referrals_handler, resolve_referral_handler};
