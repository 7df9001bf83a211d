//! REST API layer for HTTP request/response handling.
//!
//! This layer is thin plumbing: it translates HTTP requests into engine
//! operations and maps [`crate::error::AppError`] kinds to status codes.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extract`] - caller credential extractors
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - request tracing middleware

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
