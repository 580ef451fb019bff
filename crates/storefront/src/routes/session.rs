//! Session route handlers.
//!
//! Establishing a profile is what the original client kept in local
//! storage; here it becomes server-side session state handed to the rest
//! of the app through the auth extractors.

use axum::{Json, http::StatusCode};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::{CustomerProfile, PartnerProfile, session_keys};

/// Store a customer profile in the session.
#[instrument(skip(session, profile), fields(user = %profile.user_id))]
pub async fn customer_login(
    session: Session,
    Json(profile): Json<CustomerProfile>,
) -> Result<StatusCode> {
    session
        .insert(session_keys::CUSTOMER_PROFILE, &profile)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Store a delivery partner profile in the session.
#[instrument(skip(session, profile), fields(partner = %profile.partner_id))]
pub async fn partner_login(
    session: Session,
    Json(profile): Json<PartnerProfile>,
) -> Result<StatusCode> {
    session
        .insert(session_keys::PARTNER_PROFILE, &profile)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Clear the session entirely: profiles and cart.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}
