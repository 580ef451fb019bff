//! Reverse-geocoding client for address-form prefill.
//!
//! Talks to a Nominatim-compatible endpoint (`format=jsonv2`). The result
//! only prefills the delivery-address form; it never feeds business logic,
//! and a failure here is reported to the caller and nothing else.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use plateful_core::{Address, GeoPoint};

use crate::config::GeocoderConfig;

/// Errors that can occur when reverse-geocoding.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Reverse-geocoding client.
#[derive(Clone)]
pub struct GeocoderClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocoderClient {
    /// Create a new geocoder client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        // Nominatim's usage policy requires an identifying User-Agent.
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("plateful-storefront"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Resolve a point to an address suitable for form prefill.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    #[instrument(skip(self))]
    pub async fn reverse(&self, point: GeoPoint) -> Result<Address, GeocodeError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("format", "jsonv2"),
                ("lat", &point.latitude.to_string()),
                ("lon", &point.longitude.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reverse: ReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        Ok(reverse.address.into_address(point))
    }
}

/// Nominatim jsonv2 reverse response (the slice we use).
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: ReverseAddress,
}

/// Nominatim address details, with the fallbacks the form relies on.
#[derive(Debug, Default, Deserialize)]
struct ReverseAddress {
    house_number: Option<String>,
    road: Option<String>,
    pedestrian: Option<String>,
    neighbourhood: Option<String>,
    suburb: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
}

impl ReverseAddress {
    fn into_address(self, point: GeoPoint) -> Address {
        let road = self
            .road
            .or(self.pedestrian)
            .or(self.neighbourhood)
            .or(self.suburb)
            .unwrap_or_default();
        let street = match self.house_number {
            Some(number) if !road.is_empty() => format!("{number} {road}"),
            _ => road,
        };

        Address {
            street,
            city: self.city.or(self.town).or(self.village).unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            postal_code: self.postcode.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            latitude: Some(point.latitude),
            longitude: Some(point.longitude),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn maps_nominatim_fields_with_fallbacks() {
        let json = r#"{
            "address": {
                "house_number": "12",
                "road": "MG Road",
                "town": "Andheri",
                "state": "Maharashtra",
                "postcode": "400001",
                "country": "India"
            }
        }"#;
        let reverse: ReverseResponse = serde_json::from_str(json).unwrap();
        let address = reverse.address.into_address(GeoPoint::new(19.076, 72.8777));
        assert_eq!(address.street, "12 MG Road");
        assert_eq!(address.city, "Andheri");
        assert_eq!(address.postal_code, "400001");
        assert_eq!(address.latitude, Some(19.076));
    }

    #[test]
    fn empty_address_still_prefills_coordinates() {
        let reverse: ReverseResponse = serde_json::from_str("{}").unwrap();
        let address = reverse.address.into_address(GeoPoint::new(1.0, 2.0));
        assert_eq!(address.street, "");
        assert_eq!(address.longitude, Some(2.0));
    }
}
