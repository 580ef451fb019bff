//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//!
//! # Session (role profiles)
//! POST /session/customer        - Establish a customer profile
//! POST /session/partner         - Establish a delivery partner profile
//! POST /session/logout          - Clear the session
//!
//! # Browsing
//! GET  /restaurants/{id}/menu   - Restaurant menu (cached)
//! GET  /geocode/reverse         - Reverse-geocode for address prefill
//!
//! # Cart
//! GET  /cart                    - Cart contents and totals
//! POST /cart/items              - Add one of an item
//! POST /cart/items/remove       - Remove one of an item
//! POST /cart/clear              - Empty the cart
//! GET  /cart/count              - Cart badge count
//!
//! # Checkout
//! POST /checkout                - Submit the cart as an order
//!
//! # Delivery partner (requires partner profile)
//! GET  /partner/orders                         - Active orders
//! PUT  /partner/availability                   - Availability/location update
//! POST /partner/location                       - Report a device fix
//! GET  /partner/position                       - Latest published position
//! POST /partner/orders/{id}/out-for-delivery   - Start the delivery leg
//! POST /partner/orders/{id}/delivered          - Finish the delivery leg
//! ```

pub mod address;
pub mod cart;
pub mod checkout;
pub mod menu;
pub mod partner;
pub mod session;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/customer", post(session::customer_login))
        .route("/partner", post(session::partner_login))
        .route("/logout", post(session::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the delivery partner routes router.
pub fn partner_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(partner::orders))
        .route("/availability", put(partner::availability))
        .route("/location", post(partner::report_location))
        .route("/position", get(partner::position))
        .route(
            "/orders/{id}/out-for-delivery",
            post(partner::out_for_delivery),
        )
        .route("/orders/{id}/delivered", post(partner::delivered))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Session routes
        .nest("/session", session_routes())
        // Browsing
        .route("/restaurants/{id}/menu", get(menu::show))
        .route("/geocode/reverse", get(address::reverse))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::place))
        // Delivery partner routes
        .nest("/partner", partner_routes())
}
