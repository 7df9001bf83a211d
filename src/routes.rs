//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /Referrals`          - issue (or reuse) a referral link
//! - `GET  /Referrals`          - list referrals for a user
//! - `POST /Referrals/Resolve`  - resolve a referral at onboarding
//! - `GET  /health`             - component health check
//!
//! # Middleware
//!
//! - **Tracing** - structured request/response logging
//! - **Path normalization** - trailing slash handling

use crate::api::handlers::{
    create_referral_handler, health_handler, list_referrals_handler, resolve_referral_handler,
};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::{Router, routing::get, routing::post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route(
            "/Referrals",
            post(create_referral_handler).get(list_referrals_handler),
        )
        .route("/Referrals/Resolve", post(resolve_referral_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
