#![allow(dead_code)]

use axum::{Json, Router, http::StatusCode, routing::get, routing::post};
use chrono::Duration;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use referral_service::api::handlers::{
    create_referral_handler, health_handler, list_referrals_handler, resolve_referral_handler,
};
use referral_service::application::services::ReferralService;
use referral_service::infrastructure::identity::HeaderIdentityProvider;
use referral_service::infrastructure::shortlink::ShortIoClient;
use referral_service::infrastructure::store::InMemoryReferralStore;
use referral_service::state::AppState;

pub const DEEP_LINK_BASE: &str = "app://referrals/onboarding";

/// Spawns a stub vendor server on a random local port and returns its URL.
pub async fn spawn_vendor(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/links")
}

/// Vendor stub that always succeeds with the given short link.
pub fn vendor_ok(short_url: &'static str) -> Router {
    Router::new().route(
        "/links",
        post(move || async move { Json(json!({ "shortURL": short_url })) }),
    )
}

/// Vendor stub that succeeds and counts how many times it was called.
pub fn vendor_counting(short_url: &'static str, calls: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/links",
        post(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Json(json!({ "shortURL": short_url }))
        }),
    )
}

/// Vendor stub that fails with the given status and body.
pub fn vendor_error(status: StatusCode, body: &'static str) -> Router {
    Router::new().route("/links", post(move || async move { (status, body) }))
}

/// Vendor stub that returns 200 with a body missing the expected field.
pub fn vendor_malformed() -> Router {
    Router::new().route(
        "/links",
        post(|| async { Json(json!({ "invalid": "value" })) }),
    )
}

/// Builds application state wired against the given vendor URL.
pub fn create_test_state(vendor_url: &str) -> AppState {
    create_test_state_with_ttl(vendor_url, 30)
}

/// Like [`create_test_state`] but with a custom referral TTL in days.
///
/// A negative TTL mints referrals that are already expired, which is how the
/// expiration path is exercised end to end.
pub fn create_test_state_with_ttl(vendor_url: &str, ttl_days: i64) -> AppState {
    let shortener = Arc::new(
        ShortIoClient::new(
            vendor_url,
            "test-api-key",
            "short.test",
            std::time::Duration::from_secs(5),
        )
        .unwrap(),
    );

    let referral_service = Arc::new(ReferralService::new(
        Arc::new(InMemoryReferralStore::new()),
        Arc::new(HeaderIdentityProvider::new()),
        shortener,
        DEEP_LINK_BASE.to_string(),
        Some(Duration::days(ttl_days)),
    ));

    AppState::new(referral_service)
}

/// Full application router without the outer normalize-path layer, which
/// `axum_test::TestServer` does not need.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/Referrals",
            post(create_referral_handler).get(list_referrals_handler),
        )
        .route("/Referrals/Resolve", post(resolve_referral_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
