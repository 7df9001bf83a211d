//! Referral entity and its owned link value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a referral.
///
/// `Pending` is the only initial state. The transition to `Complete` happens
/// exactly once, at resolution, and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferralStatus {
    Pending,
    Complete,
}

/// Channel through which a referral link is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Social,
}

/// Sharable link owned by a referral.
///
/// Has no lifecycle of its own: it is created with its referral and mutated
/// only through it. `short_link_url` is populated from the vendor response
/// before the referral is ever persisted, so a stored referral always carries
/// a usable short link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralLink {
    pub link_id: Uuid,
    pub deep_link_url: String,
    pub short_link_url: String,
    pub channel: Channel,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ReferralLink {
    /// Returns true if the link carries an expiry and that instant has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() > e)
    }
}

/// A referrer's invitation and its resolution state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Referral {
    /// Assigned at creation, immutable thereafter.
    pub id: Uuid,
    pub referrer_user_id: i64,
    /// Set exactly when `status` becomes `Complete`, immutable thereafter.
    pub referee_user_id: Option<i64>,
    pub referee_name: Option<String>,
    pub status: ReferralStatus,
    /// The referrer's stable code, copied in at creation.
    pub referral_code: String,
    pub created_at: DateTime<Utc>,
    /// Updated on every mutation.
    pub modified_at: DateTime<Utc>,
    pub link: ReferralLink,
}

impl Referral {
    /// Creates a fresh `Pending` referral for a referrer.
    pub fn new_pending(
        referrer_user_id: i64,
        referral_code: String,
        deep_link_url: String,
        short_link_url: String,
        channel: Channel,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            referrer_user_id,
            referee_user_id: None,
            referee_name: None,
            status: ReferralStatus::Pending,
            referral_code,
            created_at: now,
            modified_at: now,
            link: ReferralLink {
                link_id: Uuid::new_v4(),
                deep_link_url,
                short_link_url,
                channel,
                expires_at,
            },
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReferralStatus::Pending
    }

    /// Returns true if this referral was completed by the given user.
    pub fn resolved_by(&self, user_id: i64) -> bool {
        self.status == ReferralStatus::Complete && self.referee_user_id == Some(user_id)
    }
}
