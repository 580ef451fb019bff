//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! The taxonomy: validation and auth failures are the caller's to fix;
//! marketplace and geocoder failures are reported, never retried. A failed
//! order submission keeps the server/transport message so the customer
//! sees why, and can re-trigger submission.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::geocode::GeocodeError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request failed a precondition (empty cart, missing field).
    #[error("validation error: {0}")]
    Validation(String),

    /// No resolvable user or partner identity.
    #[error("auth error: {0}")]
    Auth(String),

    /// An order submission did not go through; the cart is intact.
    #[error("order submission failed: {0}")]
    SubmissionFailed(String),

    /// Marketplace backend call failed.
    #[error("marketplace error: {0}")]
    Api(#[from] ApiError),

    /// Reverse-geocoding call failed.
    #[error("geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Session store operation failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart | CheckoutError::MissingAddress => {
                Self::Validation(err.to_string())
            }
            CheckoutError::MissingUser => Self::Auth(err.to_string()),
            CheckoutError::Submission(api) => Self::SubmissionFailed(api.to_string()),
        }
    }
}

/// JSON error body returned to the client.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if matches!(
            self,
            Self::Api(_) | Self::SubmissionFailed(_) | Self::Session(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::SubmissionFailed(_) | Self::Geocode(_) => StatusCode::BAD_GATEWAY,
            Self::Api(api) => match api {
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internals; submission failures keep their message so
        // the customer sees why the order did not go through.
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Api(api) => match api {
                ApiError::NotFound(_) => self.to_string(),
                _ => "Marketplace service error".to_string(),
            },
            Self::Geocode(_) => "Geocoding service error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn validation_maps_to_bad_request() {
        assert_eq!(
            status_of(AppError::Validation("empty cart".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn auth_maps_to_unauthorized() {
        assert_eq!(
            status_of(AppError::Auth("missing user".to_string())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn submission_failure_maps_to_bad_gateway() {
        assert_eq!(
            status_of(AppError::SubmissionFailed("500".to_string())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn api_not_found_maps_to_not_found() {
        assert_eq!(
            status_of(AppError::Api(ApiError::NotFound("order".to_string()))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn checkout_errors_map_onto_the_taxonomy() {
        assert!(matches!(
            AppError::from(CheckoutError::EmptyCart),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(CheckoutError::MissingUser),
            AppError::Auth(_)
        ));
        assert!(matches!(
            AppError::from(CheckoutError::Submission(ApiError::Server {
                status: 500,
                message: "boom".to_string()
            })),
            AppError::SubmissionFailed(_)
        ));
    }
}
