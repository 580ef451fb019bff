//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::MarketplaceClient;
use crate::config::StorefrontConfig;
use crate::geocode::{GeocodeError, GeocoderClient};
use crate::tracking::{FixBoard, TrackerSet};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the marketplace client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    marketplace: MarketplaceClient,
    geocoder: GeocoderClient,
    fixes: Arc<FixBoard>,
    trackers: TrackerSet,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the geocoder HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, GeocodeError> {
        let marketplace = MarketplaceClient::new(&config.marketplace);
        let geocoder = GeocoderClient::new(&config.geocoder)?;
        let fixes = Arc::new(FixBoard::default());
        let source: Arc<dyn crate::tracking::LocationSource> = fixes.clone();
        let gateway: Arc<dyn crate::tracking::AvailabilityGateway> =
            Arc::new(marketplace.clone());
        let trackers = TrackerSet::new(source, gateway);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                marketplace,
                geocoder,
                fixes,
                trackers,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace backend client.
    #[must_use]
    pub fn marketplace(&self) -> &MarketplaceClient {
        &self.inner.marketplace
    }

    /// Get a reference to the reverse-geocoding client.
    #[must_use]
    pub fn geocoder(&self) -> &GeocoderClient {
        &self.inner.geocoder
    }

    /// Get a reference to the board of latest device fixes.
    #[must_use]
    pub fn fixes(&self) -> &FixBoard {
        &self.inner.fixes
    }

    /// Get a reference to the per-partner ride trackers.
    #[must_use]
    pub fn trackers(&self) -> &TrackerSet {
        &self.inner.trackers
    }
}
