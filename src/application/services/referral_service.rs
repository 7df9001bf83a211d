//! Referral lifecycle engine.
//!
//! All business rules live here: reuse-or-mint on generate, the resolution
//! rule chain, and every `Pending -> Complete` transition. The service itself
//! is stateless and is shared across request handlers via `Arc`; the store is
//! the only shared mutable resource.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::{Channel, Referral, ReferralStatus};
use crate::domain::identity::{AuthContext, AuthenticatedUser, IdentityProvider};
use crate::domain::store::ReferralStore;
use crate::error::AppError;
use crate::infrastructure::shortlink::LinkShortener;

/// Service driving referral creation, listing and resolution.
pub struct ReferralService<S: ReferralStore, I: IdentityProvider, V: LinkShortener> {
    store: Arc<S>,
    identity: Arc<I>,
    shortener: Arc<V>,
    deep_link_base: String,
    /// Lifetime of a newly minted referral link. `None` disables expiry.
    referral_ttl: Option<Duration>,
}

impl<S: ReferralStore, I: IdentityProvider, V: LinkShortener> ReferralService<S, I, V> {
    pub fn new(
        store: Arc<S>,
        identity: Arc<I>,
        shortener: Arc<V>,
        deep_link_base: String,
        referral_ttl: Option<Duration>,
    ) -> Self {
        Self {
            store,
            identity,
            shortener,
            deep_link_base,
            referral_ttl,
        }
    }

    /// Issues a referral link for the authenticated caller.
    ///
    /// If the caller already has a `Pending` referral (at most one exists, by
    /// invariant), it is reused: only the sharing channel and `modified_at`
    /// change, and the vendor is not called. Otherwise a deep link is built
    /// from the caller's referral code, shortened by the vendor, and a fresh
    /// `Pending` referral is persisted.
    ///
    /// Two concurrent calls for the same user can both miss the pending check
    /// before either inserts; the check is not atomic across the vendor call.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthenticated`] if no caller can be resolved
    /// - [`AppError::Vendor`] / [`AppError::MalformedVendorResponse`] on
    ///   vendor failure; nothing is persisted in that case
    pub async fn generate_link(
        &self,
        ctx: &AuthContext,
        channel: Channel,
    ) -> Result<Referral, AppError> {
        let user = self.resolve_caller(ctx).await?;

        let pending = self
            .store
            .get_all()
            .await?
            .into_iter()
            .find(|r| r.referrer_user_id == user.user_id && r.is_pending());

        if let Some(mut referral) = pending {
            referral.link.channel = channel;
            referral.modified_at = Utc::now();
            self.store.update(referral.clone()).await?;

            tracing::debug!(referral_id = %referral.id, user_id = user.user_id, "reused pending referral");
            return Ok(referral);
        }

        let deep_link_url = self.deep_link_url(&user.referral_code);
        let short_link_url = self.shortener.shorten(&deep_link_url).await?;

        let expires_at = self.referral_ttl.map(|ttl| Utc::now() + ttl);
        let referral = Referral::new_pending(
            user.user_id,
            user.referral_code,
            deep_link_url,
            short_link_url,
            channel,
            expires_at,
        );
        self.store.add(referral.clone()).await?;

        tracing::info!(referral_id = %referral.id, user_id = referral.referrer_user_id, "created referral");
        Ok(referral)
    }

    /// Lists all referrals created by the given user, in insertion order.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Referral>, AppError> {
        let referrals = self
            .store
            .get_all()
            .await?
            .into_iter()
            .filter(|r| r.referrer_user_id == user_id)
            .collect();
        Ok(referrals)
    }

    /// Resolves a referral when a new user completes onboarding through it.
    ///
    /// The check order is significant: existence and already-resolved run
    /// before identity resolution, so a caller cannot distinguish "not found"
    /// from "forbidden" by probing before authenticating, and a completed
    /// referral reports [`AppError::AlreadyResolved`] regardless of caller.
    ///
    /// Full order: not-found, already-resolved, expired, unauthenticated,
    /// self-referral, already-referred.
    pub async fn resolve_referral(
        &self,
        referral_id: Uuid,
        referee_name: &str,
        ctx: &AuthContext,
    ) -> Result<Referral, AppError> {
        let mut referral = self
            .store
            .get_by_id(referral_id)
            .await?
            .ok_or_else(|| AppError::not_found("Referral not found"))?;

        if referral.status == ReferralStatus::Complete {
            return Err(AppError::already_resolved("Referral already resolved"));
        }

        if referral.link.is_expired() {
            return Err(AppError::expired("Referral link expired"));
        }

        let user = self.resolve_caller(ctx).await?;

        if user.user_id == referral.referrer_user_id {
            return Err(AppError::forbidden("Self-referrals are not allowed"));
        }

        let already_referred = self
            .store
            .get_all()
            .await?
            .iter()
            .any(|r| r.resolved_by(user.user_id));
        if already_referred {
            return Err(AppError::already_referred(
                "User has already completed a referral",
            ));
        }

        referral.referee_user_id = Some(user.user_id);
        referral.referee_name = Some(referee_name.to_string());
        referral.status = ReferralStatus::Complete;
        referral.modified_at = Utc::now();
        self.store.update(referral.clone()).await?;

        tracing::info!(referral_id = %referral.id, referee_user_id = user.user_id, "resolved referral");
        Ok(referral)
    }

    /// Number of referrals currently in the store. Used by the health check.
    pub async fn referral_count(&self) -> Result<usize, AppError> {
        Ok(self.store.get_all().await?.len())
    }

    async fn resolve_caller(&self, ctx: &AuthContext) -> Result<AuthenticatedUser, AppError> {
        self.identity
            .resolve(ctx)
            .await?
            .ok_or_else(|| AppError::unauthenticated("User not found"))
    }

    fn deep_link_url(&self, referral_code: &str) -> String {
        format!("{}?referral_code={}", self.deep_link_base, referral_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::MockIdentityProvider;
    use crate::domain::store::MockReferralStore;
    use crate::infrastructure::shortlink::MockLinkShortener;

    const DEEP_LINK_BASE: &str = "app://referrals/onboarding";

    fn test_user(user_id: i64, code: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id,
            referral_code: code.to_string(),
        }
    }

    fn test_referral(referrer_user_id: i64, code: &str) -> Referral {
        Referral::new_pending(
            referrer_user_id,
            code.to_string(),
            format!("{DEEP_LINK_BASE}?referral_code={code}"),
            "https://short.link/abc".to_string(),
            Channel::Email,
            Some(Utc::now() + Duration::days(30)),
        )
    }

    fn resolved_referral(referrer_user_id: i64, referee_user_id: i64) -> Referral {
        let mut referral = test_referral(referrer_user_id, "ZZZ999");
        referral.status = ReferralStatus::Complete;
        referral.referee_user_id = Some(referee_user_id);
        referral.referee_name = Some("Somebody".to_string());
        referral
    }

    fn service(
        store: MockReferralStore,
        identity: MockIdentityProvider,
        shortener: MockLinkShortener,
    ) -> ReferralService<MockReferralStore, MockIdentityProvider, MockLinkShortener> {
        ReferralService::new(
            Arc::new(store),
            Arc::new(identity),
            Arc::new(shortener),
            DEEP_LINK_BASE.to_string(),
            Some(Duration::days(30)),
        )
    }

    fn identity_returning(user: AuthenticatedUser) -> MockIdentityProvider {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_resolve()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        identity
    }

    fn unauthenticated_identity() -> MockIdentityProvider {
        let mut identity = MockIdentityProvider::new();
        identity.expect_resolve().times(1).returning(|_| Ok(None));
        identity
    }

    #[tokio::test]
    async fn test_generate_creates_pending_referral() {
        let mut store = MockReferralStore::new();
        store.expect_get_all().times(1).returning(|| Ok(vec![]));
        store
            .expect_add()
            .withf(|r| {
                r.is_pending()
                    && r.referrer_user_id == 1
                    && r.referral_code == "ABC123"
                    && r.link.short_link_url == "https://short.link/abc"
                    && r.link.expires_at.is_some()
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut shortener = MockLinkShortener::new();
        shortener
            .expect_shorten()
            .withf(|url| url == "app://referrals/onboarding?referral_code=ABC123")
            .times(1)
            .returning(|_| Ok("https://short.link/abc".to_string()));

        let service = service(store, identity_returning(test_user(1, "ABC123")), shortener);

        let referral = service
            .generate_link(&AuthContext::default(), Channel::Email)
            .await
            .unwrap();

        assert!(referral.is_pending());
        assert_eq!(referral.referrer_user_id, 1);
        assert_eq!(referral.link.channel, Channel::Email);
        assert_eq!(referral.link.short_link_url, "https://short.link/abc");
    }

    #[tokio::test]
    async fn test_generate_reuses_pending_referral_without_vendor_call() {
        let existing = test_referral(1, "ABC123");
        let existing_id = existing.id;
        let previous_modified = existing.modified_at;

        let mut store = MockReferralStore::new();
        store
            .expect_get_all()
            .times(1)
            .returning(move || Ok(vec![existing.clone()]));
        store
            .expect_update()
            .withf(move |r| r.id == existing_id && r.link.channel == Channel::Sms)
            .times(1)
            .returning(|_| Ok(()));
        store.expect_add().times(0);

        let mut shortener = MockLinkShortener::new();
        shortener.expect_shorten().times(0);

        let service = service(store, identity_returning(test_user(1, "ABC123")), shortener);

        let referral = service
            .generate_link(&AuthContext::default(), Channel::Sms)
            .await
            .unwrap();

        assert_eq!(referral.id, existing_id);
        assert_eq!(referral.link.channel, Channel::Sms);
        assert!(referral.modified_at >= previous_modified);
        assert!(referral.is_pending());
    }

    #[tokio::test]
    async fn test_generate_ignores_completed_referrals_of_same_user() {
        let completed = resolved_referral(1, 5);

        let mut store = MockReferralStore::new();
        store
            .expect_get_all()
            .times(1)
            .returning(move || Ok(vec![completed.clone()]));
        store.expect_add().times(1).returning(|_| Ok(()));

        let mut shortener = MockLinkShortener::new();
        shortener
            .expect_shorten()
            .times(1)
            .returning(|_| Ok("https://short.link/new".to_string()));

        let service = service(store, identity_returning(test_user(1, "ABC123")), shortener);

        let referral = service
            .generate_link(&AuthContext::default(), Channel::Email)
            .await
            .unwrap();

        assert!(referral.is_pending());
        assert_eq!(referral.link.short_link_url, "https://short.link/new");
    }

    #[tokio::test]
    async fn test_generate_unauthenticated() {
        let mut store = MockReferralStore::new();
        store.expect_get_all().times(0);

        let mut shortener = MockLinkShortener::new();
        shortener.expect_shorten().times(0);

        let service = service(store, unauthenticated_identity(), shortener);

        let err = service
            .generate_link(&AuthContext::default(), Channel::Email)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_generate_vendor_error_persists_nothing() {
        let mut store = MockReferralStore::new();
        store.expect_get_all().times(1).returning(|| Ok(vec![]));
        store.expect_add().times(0);

        let mut shortener = MockLinkShortener::new();
        shortener
            .expect_shorten()
            .times(1)
            .returning(|_| Err(AppError::vendor(400, "Vendor failure")));

        let service = service(store, identity_returning(test_user(1, "ABC123")), shortener);

        let err = service
            .generate_link(&AuthContext::default(), Channel::Email)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Vendor { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_generate_malformed_vendor_response_persists_nothing() {
        let mut store = MockReferralStore::new();
        store.expect_get_all().times(1).returning(|| Ok(vec![]));
        store.expect_add().times(0);

        let mut shortener = MockLinkShortener::new();
        shortener.expect_shorten().times(1).returning(|_| {
            Err(AppError::malformed_vendor_response(
                "Vendor response missing shortURL",
            ))
        });

        let service = service(store, identity_returning(test_user(1, "ABC123")), shortener);

        let err = service
            .generate_link(&AuthContext::default(), Channel::Email)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedVendorResponse(_)));
    }

    #[tokio::test]
    async fn test_list_for_user_filters_by_referrer() {
        let mine_pending = test_referral(1, "ABC123");
        let mine_complete = resolved_referral(1, 9);
        let someone_elses = test_referral(2, "DEF456");

        let expected: Vec<Uuid> = vec![mine_pending.id, mine_complete.id];

        let mut store = MockReferralStore::new();
        store.expect_get_all().times(1).returning(move || {
            Ok(vec![
                mine_pending.clone(),
                someone_elses.clone(),
                mine_complete.clone(),
            ])
        });

        let service = service(store, MockIdentityProvider::new(), MockLinkShortener::new());

        let referrals = service.list_for_user(1).await.unwrap();

        let ids: Vec<Uuid> = referrals.iter().map(|r| r.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_resolve_completes_referral() {
        let referral = test_referral(1, "ABC123");
        let referral_id = referral.id;

        let mut store = MockReferralStore::new();
        {
            let referral = referral.clone();
            store
                .expect_get_by_id()
                .withf(move |id| *id == referral_id)
                .times(1)
                .returning(move |_| Ok(Some(referral.clone())));
        }
        store
            .expect_get_all()
            .times(1)
            .returning(move || Ok(vec![referral.clone()]));
        store
            .expect_update()
            .withf(move |r| {
                r.id == referral_id
                    && r.status == ReferralStatus::Complete
                    && r.referee_user_id == Some(2)
                    && r.referee_name.as_deref() == Some("John Doe")
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = service(
            store,
            identity_returning(test_user(2, "DEF456")),
            MockLinkShortener::new(),
        );

        let resolved = service
            .resolve_referral(referral_id, "John Doe", &AuthContext::default())
            .await
            .unwrap();

        assert_eq!(resolved.status, ReferralStatus::Complete);
        assert_eq!(resolved.referee_user_id, Some(2));
        assert_eq!(resolved.referee_name.as_deref(), Some("John Doe"));
        assert!(resolved.modified_at > resolved.created_at);
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_fails_before_identity_check() {
        let mut store = MockReferralStore::new();
        store.expect_get_by_id().times(1).returning(|_| Ok(None));

        let mut identity = MockIdentityProvider::new();
        identity.expect_resolve().times(0);

        let service = service(store, identity, MockLinkShortener::new());

        let err = service
            .resolve_referral(Uuid::new_v4(), "John Doe", &AuthContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_already_resolved_regardless_of_caller() {
        let referral = resolved_referral(1, 5);
        let referral_id = referral.id;

        let mut store = MockReferralStore::new();
        store
            .expect_get_by_id()
            .times(1)
            .returning(move |_| Ok(Some(referral.clone())));

        let mut identity = MockIdentityProvider::new();
        identity.expect_resolve().times(0);

        let service = service(store, identity, MockLinkShortener::new());

        let err = service
            .resolve_referral(referral_id, "John Doe", &AuthContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AlreadyResolved(_)));
    }

    #[tokio::test]
    async fn test_resolve_expired_link() {
        let mut referral = test_referral(1, "ABC123");
        referral.link.expires_at = Some(Utc::now() - Duration::days(1));
        let referral_id = referral.id;

        let mut store = MockReferralStore::new();
        store
            .expect_get_by_id()
            .times(1)
            .returning(move |_| Ok(Some(referral.clone())));

        let mut identity = MockIdentityProvider::new();
        identity.expect_resolve().times(0);

        let service = service(store, identity, MockLinkShortener::new());

        let err = service
            .resolve_referral(referral_id, "John Doe", &AuthContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Expired(_)));
    }

    #[tokio::test]
    async fn test_resolve_unauthenticated() {
        let referral = test_referral(1, "ABC123");
        let referral_id = referral.id;

        let mut store = MockReferralStore::new();
        store
            .expect_get_by_id()
            .times(1)
            .returning(move |_| Ok(Some(referral.clone())));
        store.expect_update().times(0);

        let service = service(store, unauthenticated_identity(), MockLinkShortener::new());

        let err = service
            .resolve_referral(referral_id, "John Doe", &AuthContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_resolve_self_referral_forbidden() {
        let referral = test_referral(1, "ABC123");
        let referral_id = referral.id;

        let mut store = MockReferralStore::new();
        store
            .expect_get_by_id()
            .times(1)
            .returning(move |_| Ok(Some(referral.clone())));
        store.expect_update().times(0);

        let service = service(
            store,
            identity_returning(test_user(1, "ABC123")),
            MockLinkShortener::new(),
        );

        let err = service
            .resolve_referral(referral_id, "John Doe", &AuthContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_resolve_caller_already_referred_elsewhere() {
        let referral = test_referral(1, "ABC123");
        let referral_id = referral.id;
        let earlier = resolved_referral(3, 2);

        let mut store = MockReferralStore::new();
        {
            let referral = referral.clone();
            store
                .expect_get_by_id()
                .times(1)
                .returning(move |_| Ok(Some(referral.clone())));
        }
        store
            .expect_get_all()
            .times(1)
            .returning(move || Ok(vec![referral.clone(), earlier.clone()]));
        store.expect_update().times(0);

        let service = service(
            store,
            identity_returning(test_user(2, "DEF456")),
            MockLinkShortener::new(),
        );

        let err = service
            .resolve_referral(referral_id, "John Doe", &AuthContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AlreadyReferred(_)));
    }
}
