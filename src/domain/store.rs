//! Store trait for referral data access.

use crate::domain::entities::Referral;
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Store interface for referral records.
///
/// The engine only ever needs point lookup, full scan, insert and in-place
/// update; ordering of the scan is insertion order.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::InMemoryReferralStore`] - process-lifetime store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralStore: Send + Sync {
    /// Returns a snapshot of all referrals in insertion order.
    ///
    /// The snapshot is stable: concurrent mutations are never observed
    /// through it.
    async fn get_all(&self) -> Result<Vec<Referral>, AppError>;

    /// Finds a referral by id.
    ///
    /// Returns `Ok(None)` if no record matches.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Referral>, AppError>;

    /// Inserts a new referral.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if a record with the same id already
    /// exists.
    async fn add(&self, referral: Referral) -> Result<(), AppError>;

    /// Replaces the record matching `referral.id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches.
    async fn update(&self, referral: Referral) -> Result<(), AppError>;
}
