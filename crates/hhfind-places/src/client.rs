//! HTTP client for the Google Places and Geocoding JSON APIs.
//!
//! Wraps `reqwest` with API key management, per-endpoint timeouts, and typed
//! response deserialization. Envelope statuses are returned to the caller for
//! text search (where `ZERO_RESULTS` is a normal outcome) and turned into
//! [`PlacesError::ApiStatus`] for details.

use std::time::Duration;

use hhfind_core::{AppConfig, Coordinate};
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::http::{build_http_client, build_url, get_json, parse_base_url};
use crate::types::{ApiStatus, DetailsResponse, GeocodeResponse, PlaceDetails, TextSearchResponse};

/// Fields requested from the details endpoint.
pub const DETAIL_FIELDS: &str = "name,formatted_address,geometry,rating,opening_hours,website,formatted_phone_number,reviews,types";

/// Connection settings shared by [`PlacesClient`] and the discovery run.
#[derive(Debug, Clone)]
pub struct PlacesSettings {
    pub base_url: String,
    pub user_agent: String,
    pub text_search_timeout: Duration,
    pub details_timeout: Duration,
    pub geocode_timeout: Duration,
}

impl PlacesSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.places_base_url.clone(),
            user_agent: config.user_agent.clone(),
            text_search_timeout: Duration::from_secs(config.text_search_timeout_secs),
            details_timeout: Duration::from_secs(config.details_timeout_secs),
            geocode_timeout: Duration::from_secs(config.geocode_timeout_secs),
        }
    }
}

/// Client for the Google Places legacy JSON endpoints.
///
/// Construct with a real credential; [`crate::VenueDiscovery`] owns the
/// "no credential configured" decision.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    settings: PlacesSettings,
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(api_key: &str, settings: PlacesSettings) -> Result<Self, PlacesError> {
        let client = build_http_client(&settings.user_agent)?;
        let base_url = parse_base_url(&settings.base_url)?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            settings,
        })
    }

    /// Runs one text search scoped to `origin` and `radius_meters`.
    ///
    /// The envelope is returned as-is so the caller can distinguish `OK`,
    /// `ZERO_RESULTS`, and failure statuses.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn text_search(
        &self,
        query: &str,
        origin: Coordinate,
        radius_meters: u32,
    ) -> Result<TextSearchResponse, PlacesError> {
        let location = format!("{},{}", origin.lat, origin.lng);
        let radius = radius_meters.to_string();
        let url = self.build_url(
            "place/textsearch/json",
            &[
                ("query", query),
                ("location", &location),
                ("radius", &radius),
            ],
        )?;
        get_json(
            &self.client,
            url,
            self.settings.text_search_timeout,
            &format!("textsearch(query={query})"),
        )
        .await
    }

    /// Fetches detail fields for one place.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiStatus`] if the envelope status is not `OK` or the
    ///   `result` object is missing.
    /// - [`PlacesError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let url = self.build_url(
            "place/details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        )?;
        let response: DetailsResponse = get_json(
            &self.client,
            url,
            self.settings.details_timeout,
            &format!("details(place_id={place_id})"),
        )
        .await?;

        match (response.status, response.result) {
            (ApiStatus::Ok, Some(result)) => Ok(result),
            (status, _) => Err(PlacesError::ApiStatus {
                status: status.to_string(),
                message: response
                    .error_message
                    .unwrap_or_else(|| "no result in details response".to_string()),
            }),
        }
    }

    /// Reverse-geocodes a coordinate through the Geocoding API.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn reverse_geocode(&self, at: Coordinate) -> Result<GeocodeResponse, PlacesError> {
        let latlng = format!("{},{}", at.lat, at.lng);
        let url = self.build_url("geocode/json", &[("latlng", &latlng)])?;
        get_json(
            &self.client,
            url,
            self.settings.geocode_timeout,
            &format!("geocode(latlng={latlng})"),
        )
        .await
    }

    /// Builds an endpoint URL with the API key appended last.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut all: Vec<(&str, &str)> = params.to_vec();
        all.push(("key", &self.api_key));
        build_url(&self.base_url, endpoint, &all)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
