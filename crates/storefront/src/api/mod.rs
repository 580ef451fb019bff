//! Marketplace REST backend client.
//!
//! The storefront delegates all persistence to the marketplace backend and
//! talks to it over plain JSON REST with `reqwest`. Restaurant menus are
//! read-mostly and cached with `moka` (5-minute TTL); everything else is a
//! direct call.

pub mod types;

pub use types::{
    AvailabilityUpdate, CreatedOrder, MenuItemDto, NewOrder, NewOrderItem, OrderDto, OrderItemDto,
};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use plateful_core::{GeoPoint, OrderId, OrderStatus, PartnerId, RestaurantId};

use crate::checkout::OrderGateway;
use crate::config::MarketplaceConfig;
use crate::tracking::AvailabilityGateway;

/// Menu cache TTL.
const MENU_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Errors that can occur when calling the marketplace backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never reached the server or the connection failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Client for the marketplace backend.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct MarketplaceClient {
    inner: Arc<MarketplaceClientInner>,
}

struct MarketplaceClientInner {
    client: reqwest::Client,
    base_url: String,
    menu_cache: Cache<RestaurantId, Arc<Vec<MenuItemDto>>>,
}

impl MarketplaceClient {
    /// Create a new marketplace client.
    #[must_use]
    pub fn new(config: &MarketplaceConfig) -> Self {
        let menu_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(MENU_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(MarketplaceClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                menu_cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Turn a non-success response into [`ApiError::Server`], preserving the
    /// body as the message so it can be surfaced to the user.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(message));
        }
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    /// Fetch a restaurant's menu, serving from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or body decode fails.
    #[instrument(skip(self), fields(restaurant = %restaurant))]
    pub async fn restaurant_menu(
        &self,
        restaurant: RestaurantId,
    ) -> Result<Arc<Vec<MenuItemDto>>, ApiError> {
        if let Some(menu) = self.inner.menu_cache.get(&restaurant).await {
            debug!("menu cache hit");
            return Ok(menu);
        }

        let url = self.url(&format!("/api/restaurants/{restaurant}/menu"));
        let response = self.inner.client.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        let menu: Vec<MenuItemDto> = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let menu = Arc::new(menu);
        self.inner
            .menu_cache
            .insert(restaurant, Arc::clone(&menu))
            .await;
        Ok(menu)
    }

    /// Create an order.
    ///
    /// Success is any 2xx response carrying the assigned order ID.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// response body without an order ID.
    #[instrument(skip(self, order), fields(restaurant = %order.restaurant_id))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<OrderId, ApiError> {
        let url = self.url("/api/orders");
        let response = self.inner.client.post(&url).json(order).send().await?;
        let response = Self::check_status(response).await?;
        let created: CreatedOrder = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("order response missing id: {e}")))?;
        Ok(created.order_id)
    }

    /// Push a delivery partner's availability and current location.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self, update), fields(partner = %partner))]
    pub async fn update_availability(
        &self,
        partner: PartnerId,
        update: &AvailabilityUpdate,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/delivery-partners/{partner}/availability"));
        let response = self.inner.client.put(&url).json(update).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Transition an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self), fields(order = %order, status = %status))]
    pub async fn update_order_status(
        &self,
        order: OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/orders/{order}/status"));
        let response = self
            .inner
            .client
            .put(&url)
            .query(&[("orderStatus", status.as_str())])
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// List a delivery partner's active orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or body decode fails.
    #[instrument(skip(self), fields(partner = %partner))]
    pub async fn partner_orders(&self, partner: PartnerId) -> Result<Vec<OrderDto>, ApiError> {
        let url = self.url(&format!("/api/delivery-partners/{partner}/orders"));
        let response = self.inner.client.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl OrderGateway for MarketplaceClient {
    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, ApiError> {
        Self::create_order(self, order).await
    }
}

#[async_trait]
impl AvailabilityGateway for MarketplaceClient {
    async fn push_location(&self, partner: PartnerId, location: GeoPoint) -> Result<(), ApiError> {
        self.update_availability(
            partner,
            &AvailabilityUpdate {
                available: true,
                current_location: Some(location),
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_keeps_status_and_message() {
        let err = ApiError::Server {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "server error: 500 - boom");
    }

    #[test]
    fn not_found_error_display() {
        let err = ApiError::NotFound("order 42".to_string());
        assert_eq!(err.to_string(), "not found: order 42");
    }

    #[test]
    fn url_joins_base_and_path() {
        let client = MarketplaceClient::new(&crate::config::MarketplaceConfig {
            base_url: "http://localhost:8080".to_string(),
        });
        assert_eq!(
            client.url("/api/orders"),
            "http://localhost:8080/api/orders"
        );
    }
}
