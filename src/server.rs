//! HTTP server initialization and runtime setup.
//!
//! Wires the vendor client, store, identity provider and engine together,
//! then hands the router to Axum.

use crate::application::services::ReferralService;
use crate::config::Config;
use crate::infrastructure::identity::HeaderIdentityProvider;
use crate::infrastructure::shortlink::ShortIoClient;
use crate::infrastructure::store::InMemoryReferralStore;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The vendor client cannot be constructed
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let shortener = Arc::new(ShortIoClient::new(
        &config.shortlink_api_url,
        &config.shortlink_api_key,
        &config.shortlink_domain,
        config.vendor_timeout(),
    )?);

    let store = Arc::new(InMemoryReferralStore::new());
    let identity = Arc::new(HeaderIdentityProvider::new());

    let referral_service = Arc::new(ReferralService::new(
        store,
        identity,
        shortener,
        config.deep_link_base.clone(),
        config.referral_ttl(),
    ));
    tracing::info!("Referral store is in-memory; records are cleared on restart");

    let state = AppState::new(referral_service);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
