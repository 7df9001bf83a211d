//! Handlers for the referral endpoints.

use axum::{Json, extract::Query, extract::State};

use crate::api::dto::{CreateReferralQuery, ListReferralsQuery, ResolveReferralQuery};
use crate::domain::entities::Referral;
use crate::domain::identity::AuthContext;
use crate::error::AppError;
use crate::state::AppState;

/// Issues a referral link for the authenticated caller.
///
/// # Endpoint
///
/// `POST /Referrals?channel={channel}`
///
/// If the caller already has a pending referral, the same referral is
/// returned with its sharing channel updated; otherwise a new one is minted
/// through the short-link vendor.
///
/// # Errors
///
/// - 400 - no authenticated caller, or the vendor rejected the request
/// - 404 - vendor response was missing the short link
pub async fn create_referral_handler(
    State(state): State<AppState>,
    Query(query): Query<CreateReferralQuery>,
    ctx: AuthContext,
) -> Result<Json<Referral>, AppError> {
    let referral = state
        .referral_service
        .generate_link(&ctx, query.channel)
        .await?;

    Ok(Json(referral))
}

/// Returns all referrals created by one user.
///
/// # Endpoint
///
/// `GET /Referrals?userId={id}`
pub async fn list_referrals_handler(
    State(state): State<AppState>,
    Query(query): Query<ListReferralsQuery>,
) -> Result<Json<Vec<Referral>>, AppError> {
    let referrals = state.referral_service.list_for_user(query.user_id).await?;

    Ok(Json(referrals))
}

/// Resolves a referral when a new user completes onboarding through it.
///
/// # Endpoint
///
/// `POST /Referrals/Resolve?referralId={uuid}&refereeName={name}`
///
/// # Errors
///
/// - 404 - referral does not exist
/// - 403 - caller is the referrer (self-referral)
/// - 400 - already resolved, expired, already referred, or unauthenticated
pub async fn resolve_referral_handler(
    State(state): State<AppState>,
    Query(query): Query<ResolveReferralQuery>,
    ctx: AuthContext,
) -> Result<Json<Referral>, AppError> {
    let referral = state
        .referral_service
        .resolve_referral(query.referral_id, &query.referee_name, &ctx)
        .await?;

    Ok(Json(referral))
}
