//! Authentication extractors.
//!
//! Provides extractors for requiring a role profile in route handlers. The
//! profile is established by the session routes and lives server-side; a
//! request without one is rejected with 401.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CustomerProfile, PartnerProfile, session_keys};

/// Error returned when a role profile is required but absent.
pub struct AuthRejection(&'static str);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": self.0 }))).into_response()
    }
}

/// Extractor that requires a customer profile in the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn checkout(
///     RequireCustomer(customer): RequireCustomer,
/// ) -> impl IntoResponse {
///     format!("ordering as {}", customer.name)
/// }
/// ```
pub struct RequireCustomer(pub CustomerProfile);

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection("missing user"))?;

        let profile: CustomerProfile = session
            .get(session_keys::CUSTOMER_PROFILE)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection("missing user"))?;

        Ok(Self(profile))
    }
}

/// Extractor that requires a delivery partner profile in the session.
pub struct RequirePartner(pub PartnerProfile);

impl<S> FromRequestParts<S> for RequirePartner
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection("missing partner"))?;

        let profile: PartnerProfile = session
            .get(session_keys::PARTNER_PROFILE)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection("missing partner"))?;

        Ok(Self(profile))
    }
}
