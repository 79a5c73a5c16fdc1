//! Forward and reverse geocoding.
//!
//! Address lookups go through Nominatim (no credential needed). Reverse
//! lookups for explicit coordinates use the Google Geocoding API when a key is
//! configured, and Nominatim otherwise.

use std::time::Duration;

use hhfind_core::{AppConfig, Coordinate};
use reqwest::{Client, Url};

use crate::client::PlacesClient;
use crate::error::{GeocodeError, PlacesError};
use crate::http::{build_http_client, build_url, get_json, parse_base_url};
use crate::types::{ApiStatus, GeocodeResult, NominatimPlace, NominatimReverse};

/// A geocoded location with its human-readable address parts.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub coordinate: Coordinate,
    pub formatted_address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl PlacesClient {
    /// Reverse-geocodes `at` and extracts locality, first-level admin area,
    /// and country from the first result.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::NotFound`] for `ZERO_RESULTS` or an empty result list.
    /// - [`GeocodeError::Places`] for transport, decoding, or other status failures.
    pub async fn reverse_lookup(&self, at: Coordinate) -> Result<GeocodedPlace, GeocodeError> {
        let response = self.reverse_geocode(at).await?;
        match response.status {
            ApiStatus::Ok => {}
            ApiStatus::ZeroResults => {
                return Err(GeocodeError::NotFound {
                    query: at.to_string(),
                })
            }
            ApiStatus::Other(status) => {
                return Err(PlacesError::ApiStatus {
                    status,
                    message: response
                        .error_message
                        .unwrap_or_else(|| "No error message provided.".to_string()),
                }
                .into())
            }
        }

        let first = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound {
                query: at.to_string(),
            })?;
        Ok(place_from_google(first, at))
    }
}

fn place_from_google(result: GeocodeResult, at: Coordinate) -> GeocodedPlace {
    let mut place = GeocodedPlace {
        coordinate: at,
        formatted_address: result
            .formatted_address
            .unwrap_or_else(|| "Unknown location".to_string()),
        city: None,
        state: None,
        country: None,
    };
    for component in result.address_components {
        let has = |t: &str| component.types.iter().any(|ct| ct == t);
        if has("locality") {
            place.city = Some(component.long_name);
        } else if has("administrative_area_level_1") {
            place.state = Some(component.long_name);
        } else if has("country") {
            place.country = Some(component.long_name);
        }
    }
    place
}

/// Client for the Nominatim (OpenStreetMap) search and reverse endpoints.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PlacesError::InvalidBaseUrl`] for an unparsable base URL.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, PlacesError> {
        Ok(Self {
            client: build_http_client(user_agent)?,
            base_url: parse_base_url(base_url)?,
            timeout,
        })
    }

    /// # Errors
    ///
    /// Same as [`NominatimClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::new(
            &config.nominatim_base_url,
            &config.user_agent,
            Duration::from_secs(config.geocode_timeout_secs),
        )
    }

    /// Looks up the best match for a free-form address.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::NotFound`] if the address matches nothing.
    /// - [`GeocodeError::Places`] on transport or decoding failure.
    pub async fn forward(&self, address: &str) -> Result<GeocodedPlace, GeocodeError> {
        let url = build_url(
            &self.base_url,
            "search",
            &[
                ("q", address),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ],
        )?;
        let places: Vec<NominatimPlace> =
            get_json(&self.client, url, self.timeout, &format!("search(q={address})")).await?;
        let first = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound {
                query: address.to_string(),
            })?;
        place_from_nominatim(first, address)
    }

    /// Looks up the address nearest to `at`.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::NotFound`] if Nominatim reports an error for the point.
    /// - [`GeocodeError::Places`] on transport or decoding failure.
    pub async fn reverse(&self, at: Coordinate) -> Result<GeocodedPlace, GeocodeError> {
        let lat = at.lat.to_string();
        let lon = at.lng.to_string();
        let url = build_url(
            &self.base_url,
            "reverse",
            &[
                ("lat", &lat),
                ("lon", &lon),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
            ],
        )?;
        let response: NominatimReverse =
            get_json(&self.client, url, self.timeout, &format!("reverse({at})")).await?;
        match response {
            NominatimReverse::Found(place) => place_from_nominatim(place, &at.to_string()),
            NominatimReverse::NotFound { error } => {
                tracing::debug!(%at, error = %error, "nominatim reverse lookup found nothing");
                Err(GeocodeError::NotFound {
                    query: at.to_string(),
                })
            }
        }
    }
}

fn place_from_nominatim(place: NominatimPlace, query: &str) -> Result<GeocodedPlace, GeocodeError> {
    let not_found = || GeocodeError::NotFound {
        query: query.to_string(),
    };
    let lat = place.lat.trim().parse::<f64>().map_err(|_| not_found())?;
    let lng = place.lon.trim().parse::<f64>().map_err(|_| not_found())?;
    let coordinate = Coordinate::new(lat, lng).map_err(|_| not_found())?;
    let address = place.address.unwrap_or_default();
    Ok(GeocodedPlace {
        coordinate,
        formatted_address: place.display_name,
        city: address.city.or(address.town).or(address.village),
        state: address.state,
        country: address.country,
    })
}
