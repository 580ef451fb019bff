//! Order submission.
//!
//! Builds a single order-creation request from the cart and a delivery
//! address. Failure leaves the cart untouched so the customer can retry;
//! success clears it. There is no automatic retry - every failure requires
//! the customer to re-trigger submission.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::instrument;

use plateful_core::{
    Address, Cart, DiscountRule, OrderId, OrderStatus, RestaurantId, Totals, UserId,
};

use crate::api::{ApiError, NewOrder, NewOrderItem};

/// The single network call checkout makes, as a seam for testing.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Issue the order-creation request, returning the assigned ID.
    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, ApiError>;
}

/// Why an order submission did not go through.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Cart has no entries; nothing to order.
    #[error("empty cart")]
    EmptyCart,

    /// No resolvable customer identity.
    #[error("missing user")]
    MissingUser,

    /// No delivery address on the request or the profile.
    #[error("missing delivery address")]
    MissingAddress,

    /// The create-order call failed; the cart is intact and the customer
    /// may retry.
    #[error("submission failed: {0}")]
    Submission(#[from] ApiError),
}

/// Everything checkout needs besides the cart itself.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// The customer placing the order, if one is resolvable.
    pub user: Option<UserId>,
    /// The restaurant the cart was filled from.
    pub restaurant: RestaurantId,
    /// Where to deliver; already defaulted from the profile by the caller.
    pub address: Option<Address>,
    /// Wall-clock submission time, truncated to whole seconds.
    pub placed_at: NaiveDateTime,
}

/// Submit the cart as an order.
///
/// Preconditions are checked in order: non-empty cart, then resolvable
/// user, then a present delivery address. On success the cart is cleared
/// and the server-assigned order ID returned. On any failure the cart is
/// left exactly as it was.
///
/// # Errors
///
/// Returns [`CheckoutError`] for failed preconditions or a failed
/// create-order call.
#[instrument(skip(gateway, cart, rule, request), fields(restaurant = %request.restaurant))]
pub async fn place_order(
    gateway: &dyn OrderGateway,
    cart: &mut Cart,
    rule: &dyn DiscountRule,
    request: CheckoutRequest,
) -> Result<OrderId, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let user = request.user.ok_or(CheckoutError::MissingUser)?;
    let address = request.address.ok_or(CheckoutError::MissingAddress)?;

    let totals = Totals::compute(cart, rule);
    let order = NewOrder {
        user_id: user,
        restaurant_id: request.restaurant,
        order_status: OrderStatus::Placed,
        total_amount: totals.total.rounded(),
        delivery_address: address,
        order_time: request.placed_at,
        order_items: cart
            .entries()
            .map(|entry| NewOrderItem {
                menu_item_id: entry.item.id,
                quantity: entry.quantity,
                price: entry.item.price,
            })
            .collect(),
    };

    let order_id = gateway.create_order(&order).await?;

    // Only an acknowledged success discards the cart.
    cart.clear();
    Ok(order_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::NaiveDate;
    use plateful_core::{MenuItem, MenuItemId, Money, NoPromotion};

    /// Gateway double: scripted response, captured request, call count.
    struct FakeGateway {
        fail_with_status: Option<u16>,
        calls: Mutex<u32>,
        captured: Mutex<Option<NewOrder>>,
    }

    impl FakeGateway {
        fn succeeding() -> Self {
            Self {
                fail_with_status: None,
                calls: Mutex::new(0),
                captured: Mutex::new(None),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                fail_with_status: Some(status),
                ..Self::succeeding()
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl OrderGateway for FakeGateway {
        async fn create_order(&self, order: &NewOrder) -> Result<OrderId, ApiError> {
            *self.calls.lock().unwrap() += 1;
            *self.captured.lock().unwrap() = Some(order.clone());
            match self.fail_with_status {
                Some(status) => Err(ApiError::Server {
                    status,
                    message: "internal error".to_string(),
                }),
                None => Ok(OrderId::new(501)),
            }
        }
    }

    fn item(id: i64, price_major: i64) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(id),
            name: format!("item-{id}"),
            price: Money::from_major(price_major),
            category: None,
            available: true,
        }
    }

    fn address() -> Address {
        Address {
            street: "123 MG Road".to_string(),
            city: "Mumbai".to_string(),
            state: "Maharashtra".to_string(),
            postal_code: "400001".to_string(),
            country: "India".to_string(),
            latitude: Some(19.076),
            longitude: Some(72.8777),
        }
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            user: Some(UserId::new(9)),
            restaurant: RestaurantId::new(4),
            address: Some(address()),
            placed_at: NaiveDate::from_ymd_opt(2026, 8, 6)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn empty_cart_fails_validation_without_a_network_call() {
        let gateway = FakeGateway::succeeding();
        let mut cart = Cart::new();

        let err = place_order(&gateway, &mut cart, &NoPromotion, request())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn missing_user_fails_auth_without_a_network_call() {
        let gateway = FakeGateway::succeeding();
        let mut cart = Cart::new();
        cart.increment(item(1, 100));

        let req = CheckoutRequest {
            user: None,
            ..request()
        };
        let err = place_order(&gateway, &mut cart, &NoPromotion, req)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::MissingUser));
        assert_eq!(gateway.calls(), 0);
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn server_failure_leaves_the_cart_intact_for_retry() {
        let mut cart = Cart::new();
        cart.increment(item(1, 100));
        cart.increment(item(1, 100));
        cart.increment(item(2, 50));

        let failing = FakeGateway::failing(500);
        let err = place_order(&failing, &mut cart, &NoPromotion, request())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(_)));
        assert_eq!(failing.calls(), 1);
        // no partial mutation: the cart is exactly as it was
        assert_eq!(cart.quantity_of(MenuItemId::new(1)), 2);
        assert_eq!(cart.quantity_of(MenuItemId::new(2)), 1);

        // the customer re-triggers submission and it goes through
        let retry = FakeGateway::succeeding();
        let order_id = place_order(&retry, &mut cart, &NoPromotion, request())
            .await
            .unwrap();
        assert_eq!(order_id, OrderId::new(501));
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn success_clears_the_cart_and_builds_the_expected_payload() {
        let gateway = FakeGateway::succeeding();
        let mut cart = Cart::new();
        cart.increment(item(1, 100));
        cart.increment(item(1, 100));
        cart.increment(item(2, 50));

        let order_id = place_order(&gateway, &mut cart, &NoPromotion, request())
            .await
            .unwrap();
        assert_eq!(order_id, OrderId::new(501));
        assert!(cart.is_empty());

        let sent = gateway.captured.lock().unwrap().clone().unwrap();
        assert_eq!(sent.order_status, OrderStatus::Placed);
        // 250 subtotal + 30 delivery fee - 0 discount
        assert_eq!(sent.total_amount, Money::from_major(280));
        assert_eq!(sent.order_items.len(), 2);
        let line = sent
            .order_items
            .iter()
            .find(|l| l.menu_item_id == MenuItemId::new(1))
            .unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.price, Money::from_major(100));
    }
}
