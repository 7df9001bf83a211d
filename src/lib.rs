//! # Referral Service
//!
//! Issues referral links on behalf of authenticated users and resolves them
//! when a new user completes onboarding through one. Built with Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Referral entities and collaborator traits
//! - **Application Layer** ([`application`]) - The referral lifecycle engine
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory store, identity
//!   provider and short-link vendor client
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Lifecycle
//!
//! A referral starts `Pending` (one pending referral per referrer; repeated
//! generate calls reuse it) and moves once, irreversibly, to `Complete` when
//! a new user resolves it. Resolution enforces expiration, self-referral and
//! double-referral rules.
//!
//! ## Quick Start
//!
//! ```bash
//! # Set required environment variables
//! export SHORTLINK_API_URL="https://api.short.io/links"
//! export SHORTLINK_API_KEY="sk_..."
//! export SHORTLINK_DOMAIN="example.short.gy"
//!
//! # Start the service
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via
//! [`config::Config`]. See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::ReferralService;
    pub use crate::domain::entities::{Channel, Referral, ReferralLink, ReferralStatus};
    pub use crate::domain::identity::{AuthContext, AuthenticatedUser};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
