//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without I/O. The referral is the unit
//! of the domain; its link is an owned value with no independent lifecycle.

pub mod referral;

pub use referral::{Channel, Referral, ReferralLink, ReferralStatus};
