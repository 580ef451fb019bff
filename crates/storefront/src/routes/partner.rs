//! Delivery partner route handlers.
//!
//! The partner's device reports raw position fixes here; the per-partner
//! [`crate::tracking::RideTracker`] samples the latest fix on its own
//! five-second clock while an order is out for delivery.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use plateful_core::{GeoPoint, OrderId, OrderStatus};

use crate::api::{AvailabilityUpdate, OrderDto};
use crate::error::Result;
use crate::middleware::RequirePartner;
use crate::state::AppState;

/// List the partner's active orders.
///
/// If one of them is already out for delivery (say, after a reload) and
/// the poller is not yet on it, tracking resumes here.
#[instrument(skip(state, partner), fields(partner = %partner.0.partner_id))]
pub async fn orders(
    State(state): State<AppState>,
    partner: RequirePartner,
) -> Result<Json<Vec<OrderDto>>> {
    let partner_id = partner.0.partner_id;
    let orders = state.marketplace().partner_orders(partner_id).await?;

    if let Some(active) = orders
        .iter()
        .find(|order| order.order_status.is_out_for_delivery())
    {
        let tracker = state.trackers().for_partner(partner_id);
        if tracker.current_order().await != Some(active.order_id) {
            tracker.start(active.order_id).await;
        }
    }

    Ok(Json(orders))
}

/// Push an availability/location update to the backend.
///
/// A location in the update also counts as a device fix.
#[instrument(skip(state, partner, update), fields(partner = %partner.0.partner_id))]
pub async fn availability(
    State(state): State<AppState>,
    partner: RequirePartner,
    Json(update): Json<AvailabilityUpdate>,
) -> Result<StatusCode> {
    let partner_id = partner.0.partner_id;
    if let Some(location) = update.current_location {
        state.fixes().report(partner_id, location);
    }
    state
        .marketplace()
        .update_availability(partner_id, &update)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a raw device fix for the tracking poller to sample.
#[instrument(skip(state, partner, fix), fields(partner = %partner.0.partner_id))]
pub async fn report_location(
    State(state): State<AppState>,
    partner: RequirePartner,
    Json(fix): Json<GeoPoint>,
) -> Result<StatusCode> {
    state.fixes().report(partner.0.partner_id, fix);
    Ok(StatusCode::NO_CONTENT)
}

/// Latest published rider position for the map overlay.
#[derive(Debug, Serialize)]
pub struct PositionView {
    pub position: Option<GeoPoint>,
}

/// Read the latest published rider position.
#[instrument(skip(state, partner), fields(partner = %partner.0.partner_id))]
pub async fn position(
    State(state): State<AppState>,
    partner: RequirePartner,
) -> Result<Json<PositionView>> {
    let tracker = state.trackers().for_partner(partner.0.partner_id);
    Ok(Json(PositionView {
        position: tracker.position(),
    }))
}

/// Mark an order out for delivery and start position tracking.
///
/// Starting cancels any previous poller for this partner, so switching to
/// a new active order never leaves two timers running.
#[instrument(skip(state, partner), fields(partner = %partner.0.partner_id, order = %id))]
pub async fn out_for_delivery(
    State(state): State<AppState>,
    partner: RequirePartner,
    Path(id): Path<OrderId>,
) -> Result<StatusCode> {
    let partner_id = partner.0.partner_id;
    state
        .marketplace()
        .update_order_status(id, OrderStatus::OutForDelivery)
        .await?;

    state.trackers().for_partner(partner_id).start(id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark an order delivered and stop position tracking for it.
#[instrument(skip(state, partner), fields(partner = %partner.0.partner_id, order = %id))]
pub async fn delivered(
    State(state): State<AppState>,
    partner: RequirePartner,
    Path(id): Path<OrderId>,
) -> Result<StatusCode> {
    let partner_id = partner.0.partner_id;
    state
        .marketplace()
        .update_order_status(id, OrderStatus::Delivered)
        .await?;

    let tracker = state.trackers().for_partner(partner_id);
    if tracker.current_order().await == Some(id) {
        tracker.stop().await;
    }
    Ok(StatusCode::NO_CONTENT)
}
