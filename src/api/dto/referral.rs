//! Query DTOs for the referral endpoints.
//!
//! Responses serialize the [`crate::domain::entities::Referral`] entity
//! directly; only the inbound query parameters need their own shapes.

use crate::domain::entities::Channel;
use serde::Deserialize;
use uuid::Uuid;

/// Query parameters for `POST /Referrals`.
#[derive(Debug, Deserialize)]
pub struct CreateReferralQuery {
    pub channel: Channel,
}

/// Query parameters for `GET /Referrals`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReferralsQuery {
    pub user_id: i64,
}

/// Query parameters for `POST /Referrals/Resolve`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReferralQuery {
    pub referral_id: Uuid,
    pub referee_name: String,
}
