//! Restaurant menu route handler.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use plateful_core::RestaurantId;

use crate::api::MenuItemDto;
use crate::error::Result;
use crate::state::AppState;

/// Fetch a restaurant's menu, served from cache when fresh.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
) -> Result<Json<Vec<MenuItemDto>>> {
    let menu = state.marketplace().restaurant_menu(id).await?;
    Ok(Json((*menu).clone()))
}
