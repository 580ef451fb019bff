//! Cart route handlers.
//!
//! The cart lives in the session, keyed alongside the restaurant it was
//! filled from. Handlers deserialize it, apply one total-function mutation
//! from [`plateful_core::cart`], and write it back. Monetary fields in the
//! views are already display-rounded; everything upstream stays exact.

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use plateful_core::{
    Cart, CartEntry, MenuItem, MenuItemId, Money, NoPromotion, RestaurantId, Totals,
};

use crate::error::Result;
use crate::models::session_keys;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart and its restaurant from the session.
pub(crate) async fn read_cart(session: &Session) -> (Cart, Option<RestaurantId>) {
    let cart = session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    let restaurant = session
        .get::<RestaurantId>(session_keys::CART_RESTAURANT)
        .await
        .ok()
        .flatten();
    (cart, restaurant)
}

/// Write the cart and its restaurant back to the session.
pub(crate) async fn write_cart(
    session: &Session,
    cart: &Cart,
    restaurant: Option<RestaurantId>,
) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    match restaurant {
        Some(id) => {
            session.insert(session_keys::CART_RESTAURANT, id).await?;
        }
        None => {
            session
                .remove::<RestaurantId>(session_keys::CART_RESTAURANT)
                .await?;
        }
    }
    Ok(())
}

// =============================================================================
// Views
// =============================================================================

/// One cart line for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub quantity: u32,
    pub available: bool,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&CartEntry> for CartLineView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            menu_item_id: entry.item.id,
            name: entry.item.name.clone(),
            quantity: entry.quantity,
            available: entry.item.available,
            unit_price: entry.item.price.to_string(),
            line_total: entry.line_total().to_string(),
        }
    }
}

/// Price breakdown for display, rounded to two decimal places.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsView {
    pub subtotal: String,
    pub delivery_fee: String,
    pub discount: String,
    pub total: String,
}

impl From<Totals> for TotalsView {
    fn from(totals: Totals) -> Self {
        Self {
            subtotal: totals.subtotal.to_string(),
            delivery_fee: totals.delivery_fee.to_string(),
            discount: totals.discount.to_string(),
            total: totals.total.to_string(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub restaurant_id: Option<RestaurantId>,
    pub items: Vec<CartLineView>,
    pub item_count: u32,
    pub totals: TotalsView,
}

impl CartView {
    fn build(cart: &Cart, restaurant: Option<RestaurantId>) -> Self {
        Self {
            restaurant_id: restaurant,
            items: cart.entries().map(CartLineView::from).collect(),
            item_count: cart.total_quantity(),
            totals: Totals::compute(cart, &NoPromotion).into(),
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Add-to-cart request: the restaurant plus the item snapshot as the
/// client last fetched it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub restaurant_id: RestaurantId,
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

const fn default_available() -> bool {
    true
}

impl AddItemRequest {
    fn snapshot(&self) -> MenuItem {
        MenuItem {
            id: self.menu_item_id,
            name: self.name.clone(),
            price: self.price,
            category: self.category.clone(),
            available: self.is_available,
        }
    }
}

/// Remove-from-cart request: the item snapshot, same shape as adding.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

impl RemoveItemRequest {
    fn snapshot(&self) -> MenuItem {
        MenuItem {
            id: self.menu_item_id,
            name: self.name.clone(),
            price: self.price,
            category: self.category.clone(),
            available: self.is_available,
        }
    }
}

/// Cart badge count.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let (cart, restaurant) = read_cart(&session).await;
    Json(CartView::build(&cart, restaurant))
}

/// Add one of an item to the cart.
///
/// Filling the cart from a different restaurant starts a fresh cart, the
/// same way leaving for another restaurant page did in the original
/// storefront.
#[instrument(skip(session, request), fields(item = %request.menu_item_id))]
pub async fn add(
    session: Session,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let (mut cart, stored) = read_cart(&session).await;

    if stored.is_some_and(|r| r != request.restaurant_id) {
        cart.clear();
    }
    cart.increment(request.snapshot());

    write_cart(&session, &cart, Some(request.restaurant_id)).await?;
    Ok(Json(CartView::build(&cart, Some(request.restaurant_id))))
}

/// Remove one of an item from the cart.
#[instrument(skip(session, request), fields(item = %request.menu_item_id))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveItemRequest>,
) -> Result<Json<CartView>> {
    let (mut cart, restaurant) = read_cart(&session).await;
    cart.decrement(request.snapshot());

    let restaurant = if cart.is_empty() { None } else { restaurant };
    write_cart(&session, &cart, restaurant).await?;
    Ok(Json(CartView::build(&cart, restaurant)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<StatusCode> {
    write_cart(&session, &Cart::new(), None).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Cart badge count.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCount> {
    let (cart, _) = read_cart(&session).await;
    Json(CartCount {
        count: cart.total_quantity(),
    })
}
