//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::ReferralService;
use crate::infrastructure::identity::HeaderIdentityProvider;
use crate::infrastructure::shortlink::ShortIoClient;
use crate::infrastructure::store::InMemoryReferralStore;

/// Referral service as wired in production and integration tests.
pub type SharedReferralService =
    Arc<ReferralService<InMemoryReferralStore, HeaderIdentityProvider, ShortIoClient>>;

#[derive(Clone)]
pub struct AppState {
    pub referral_service: SharedReferralService,
}

impl AppState {
    pub fn new(referral_service: SharedReferralService) -> Self {
        Self { referral_service }
    }
}
