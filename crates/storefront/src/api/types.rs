//! Wire types for the marketplace REST backend.
//!
//! Field names follow the backend's JSON (camelCase, SCREAMING_SNAKE_CASE
//! statuses). These are transport shapes; the cart works on
//! [`plateful_core`] types converted at the edge.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use plateful_core::{
    Address, GeoPoint, MenuItem, MenuItemId, Money, OrderId, OrderStatus, PartnerId, RestaurantId,
    UserId,
};

/// A menu item as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDto {
    pub menu_item_id: MenuItemId,
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl MenuItemDto {
    /// The cart-owned snapshot of this item.
    #[must_use]
    pub fn snapshot(&self) -> MenuItem {
        MenuItem {
            id: self.menu_item_id,
            name: self.name.clone(),
            price: self.price,
            category: self.category.clone(),
            available: self.is_available,
        }
    }
}

/// An order as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub delivery_partner_id: Option<PartnerId>,
    pub order_status: OrderStatus,
    pub total_amount: Money,
    #[serde(default)]
    pub delivery_address: Option<Address>,
    #[serde(default)]
    pub order_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub delivery_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub order_items: Vec<OrderItemDto>,
}

/// A line of an order as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    #[serde(default)]
    pub order_item_id: Option<i64>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub price: Money,
}

/// An order-creation request.
///
/// `order_time` is a wall-clock timestamp truncated to whole seconds;
/// `total_amount` is rounded to two decimal places for the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub order_status: OrderStatus,
    pub total_amount: Money,
    pub delivery_address: Address,
    pub order_time: NaiveDateTime,
    pub order_items: Vec<NewOrderItem>,
}

/// One line of an order-creation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub price: Money,
}

/// The slice of the order-creation response we need: the assigned ID.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: OrderId,
}

/// A delivery partner availability/location update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityUpdate {
    pub available: bool,
    #[serde(default)]
    pub current_location: Option<GeoPoint>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn menu_item_deserializes_from_backend_json() {
        let json = r#"{
            "menuItemId": 12,
            "restaurantId": 3,
            "name": "Paneer Tikka",
            "description": "Char-grilled",
            "price": 249.5,
            "category": "Starters",
            "isAvailable": true,
            "rating": 4.4,
            "imageUrl": "https://cdn.example/p.jpg"
        }"#;
        let item: MenuItemDto = serde_json::from_str(json).unwrap();
        assert_eq!(item.menu_item_id, MenuItemId::new(12));
        assert_eq!(item.price, Money::from_minor(24950));
        assert!(item.is_available);

        let snapshot = item.snapshot();
        assert_eq!(snapshot.name, "Paneer Tikka");
        assert_eq!(snapshot.category.as_deref(), Some("Starters"));
    }

    #[test]
    fn new_order_serializes_with_backend_field_names() {
        let order = NewOrder {
            user_id: UserId::new(9),
            restaurant_id: RestaurantId::new(4),
            order_status: OrderStatus::Placed,
            total_amount: Money::from_major(280),
            delivery_address: Address {
                street: "123 MG Road".to_string(),
                city: "Mumbai".to_string(),
                state: "Maharashtra".to_string(),
                postal_code: "400001".to_string(),
                country: "India".to_string(),
                latitude: Some(19.076),
                longitude: Some(72.8777),
            },
            order_time: NaiveDate::from_ymd_opt(2026, 8, 6)
                .unwrap()
                .and_hms_opt(12, 30, 5)
                .unwrap(),
            order_items: vec![NewOrderItem {
                menu_item_id: MenuItemId::new(12),
                quantity: 2,
                price: Money::from_major(100),
            }],
        };

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["orderStatus"], "PLACED");
        assert_eq!(value["totalAmount"], 280.0);
        // whole-second wall-clock timestamp, no fractional part
        assert_eq!(value["orderTime"], "2026-08-06T12:30:05");
        assert_eq!(value["deliveryAddress"]["postalCode"], "400001");
        assert_eq!(value["orderItems"][0]["menuItemId"], 12);
    }

    #[test]
    fn availability_update_matches_backend_shape() {
        let update = AvailabilityUpdate {
            available: true,
            current_location: Some(GeoPoint::new(19.076, 72.8777)),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["available"], true);
        assert_eq!(value["currentLocation"]["latitude"], 19.076);
        assert_eq!(value["currentLocation"]["longitude"], 72.8777);
    }

    #[test]
    fn order_status_wire_form_is_screaming_snake_case() {
        let json = r#"{
            "orderId": 1,
            "userId": 2,
            "restaurantId": 3,
            "orderStatus": "OUT_FOR_DELIVERY",
            "totalAmount": 280.0
        }"#;
        let order: OrderDto = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_status, OrderStatus::OutForDelivery);
        assert!(order.order_items.is_empty());
    }
}
