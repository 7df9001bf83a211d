//! Process-lifetime in-memory referral store.

use crate::domain::entities::Referral;
use crate::domain::store::ReferralStore;
use crate::error::AppError;
use async_trait::async_trait;
use std::sync::Mutex;
use uuid::Uuid;

/// Concurrency-safe in-memory store.
///
/// All operations serialize on a single store-wide mutex, so a reader sees
/// either the pre- or post-update record, never a mix. The lock is never held
/// across an await point; vendor and identity calls happen before the engine
/// touches the store. State is volatile: a process restart clears everything.
#[derive(Default)]
pub struct InMemoryReferralStore {
    referrals: Mutex<Vec<Referral>>,
}

impl InMemoryReferralStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held. Used by the health check.
    pub fn len(&self) -> usize {
        self.referrals.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReferralStore for InMemoryReferralStore {
    async fn get_all(&self) -> Result<Vec<Referral>, AppError> {
        let referrals = self.referrals.lock().expect("store lock poisoned");
        Ok(referrals.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Referral>, AppError> {
        let referrals = self.referrals.lock().expect("store lock poisoned");
        Ok(referrals.iter().find(|r| r.id == id).cloned())
    }

    async fn add(&self, referral: Referral) -> Result<(), AppError> {
        let mut referrals = self.referrals.lock().expect("store lock poisoned");

        if referrals.iter().any(|r| r.id == referral.id) {
            return Err(AppError::internal(format!(
                "Referral {} already exists",
                referral.id
            )));
        }

        referrals.push(referral);
        Ok(())
    }

    async fn update(&self, referral: Referral) -> Result<(), AppError> {
        let mut referrals = self.referrals.lock().expect("store lock poisoned");

        match referrals.iter_mut().find(|r| r.id == referral.id) {
            Some(existing) => {
                *existing = referral;
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Referral {} not found",
                referral.id
            ))),
        }
    }
}
