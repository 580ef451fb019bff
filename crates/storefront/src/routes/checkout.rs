//! Checkout route handler.

use axum::{Json, extract::State};
use chrono::{SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use plateful_core::{Address, NoPromotion, OrderId};

use crate::checkout::{self, CheckoutRequest};
use crate::error::{AppError, Result};
use crate::middleware::RequireCustomer;
use crate::models::CustomerProfile;
use crate::routes::cart::{read_cart, write_cart};
use crate::state::AppState;

/// Checkout request body: an optional override of the profile address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    pub delivery_address: Option<Address>,
}

/// Checkout response: the server-assigned order ID.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
    pub order_id: OrderId,
}

/// Submit the session cart as an order.
///
/// On success the session cart is cleared; on any failure it is left
/// untouched so the customer can retry.
#[instrument(skip(state, session, customer, form), fields(user = %customer.user_id))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<OrderPlaced>> {
    let (mut cart, restaurant) = read_cart(&session).await;
    let Some(restaurant) = restaurant else {
        // nothing was ever added; same outcome as submitting an empty cart
        return Err(AppError::Validation("empty cart".to_string()));
    };

    let CustomerProfile {
        user_id, address, ..
    } = customer;
    let request = CheckoutRequest {
        user: Some(user_id),
        restaurant,
        address: form.delivery_address.or(address),
        placed_at: Utc::now().naive_utc().trunc_subsecs(0),
    };

    let order_id = checkout::place_order(state.marketplace(), &mut cart, &NoPromotion, request)
        .await
        .map_err(AppError::from)?;

    // the cart was cleared by a successful submission; persist that
    write_cart(&session, &cart, None).await?;
    Ok(Json(OrderPlaced { order_id }))
}
