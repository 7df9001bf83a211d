//! Application error taxonomy and HTTP mapping.
//!
//! Every failure the engine can produce is request-scoped: it is mapped to a
//! status code and a JSON envelope of the form
//! `{ "error": <message>, "status": <code> }` and never crashes the process.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON error envelope returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub status: u16,
}

/// All failures the referral engine and its collaborators can surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No authenticated user could be resolved for the request.
    #[error("{0}")]
    Unauthenticated(String),

    /// Referral (or store record) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Self-referral attempt.
    #[error("{0}")]
    Forbidden(String),

    /// Referral is already in the `Complete` state.
    #[error("{0}")]
    AlreadyResolved(String),

    /// The resolving user has already completed a different referral.
    #[error("{0}")]
    AlreadyReferred(String),

    /// Referral link expired before resolution.
    #[error("{0}")]
    Expired(String),

    /// Short-link vendor returned a non-success response.
    #[error("Vendor error: {status} - {body}")]
    Vendor { status: u16, body: String },

    /// Vendor responded with 2xx but the expected field was missing.
    #[error("{0}")]
    MalformedVendorResponse(String),

    /// Unclassified internal failure.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn already_resolved(message: impl Into<String>) -> Self {
        Self::AlreadyResolved(message.into())
    }

    pub fn already_referred(message: impl Into<String>) -> Self {
        Self::AlreadyReferred(message.into())
    }

    pub fn expired(message: impl Into<String>) -> Self {
        Self::Expired(message.into())
    }

    pub fn vendor(status: u16, body: impl Into<String>) -> Self {
        Self::Vendor {
            status,
            body: body.into(),
        }
    }

    pub fn malformed_vendor_response(message: impl Into<String>) -> Self {
        Self::MalformedVendorResponse(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status this error maps to.
    ///
    /// `NotFound` and `MalformedVendorResponse` map to 404, `Forbidden` to
    /// 403, internal failures to 500, every other business-rule failure
    /// to 400.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::MalformedVendorResponse(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthenticated(_)
            | AppError::AlreadyResolved(_)
            | AppError::AlreadyReferred(_)
            | AppError::Expired(_)
            | AppError::Vendor { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Internal(_) => {
                tracing::error!(error = %self, "internal error");
                "An unexpected error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
