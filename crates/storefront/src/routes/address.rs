//! Address prefill route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use plateful_core::{Address, GeoPoint};

use crate::error::Result;
use crate::state::AppState;

/// Reverse-geocode query parameters.
#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}

/// Resolve coordinates to an address for form prefill.
///
/// The result only prefills the delivery-address form; order submission
/// never depends on it.
#[instrument(skip(state))]
pub async fn reverse(
    State(state): State<AppState>,
    Query(query): Query<ReverseQuery>,
) -> Result<Json<Address>> {
    let address = state
        .geocoder()
        .reverse(GeoPoint::new(query.lat, query.lng))
        .await?;
    Ok(Json(address))
}
