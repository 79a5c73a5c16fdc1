//! Multi-keyword venue discovery against the Places API.
//!
//! Runs one text search per keyword, fetches details for every place id not
//! seen before, and finally drops anything outside the requested radius
//! (the API treats `radius` as a bias, not a hard bound). Per-query failures
//! are logged and skipped; only a missing credential aborts discovery.

use std::collections::HashSet;

use hhfind_core::config::normalize_api_key;
use hhfind_core::{distance_km, Coordinate, VenueCandidate};

use crate::client::{PlacesClient, PlacesSettings};
use crate::error::{DiscoveryError, PlacesError};
use crate::types::{ApiStatus, PlaceDetails, PlaceSummary};

/// Search phrases in priority order: hotel terms first, then generic venues.
pub const SEARCH_KEYWORDS: &[&str] = &[
    "hotel happy hour",
    "hotel bar",
    "hotel lounge",
    "lodging happy hour",
    "bar",
    "pub",
    "lounge",
    "brewery",
    "restaurant with happy hour",
    "cocktail bar",
    "wine bar",
];

/// Maximum number of review texts kept per venue.
pub const MAX_REVIEW_SNIPPETS: usize = 5;

/// Source of venue candidates for one origin.
///
/// Implemented by [`VenueDiscovery`]; the workflow is generic over it so runs
/// can be driven without a network.
#[allow(async_fn_in_trait)]
pub trait VenueSource {
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] only for failures that make the whole
    /// discovery meaningless (e.g. no credential).
    async fn discover(
        &self,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<VenueCandidate>, DiscoveryError>;
}

pub struct VenueDiscovery {
    /// `None` when no usable credential was configured.
    client: Option<PlacesClient>,
    keywords: Vec<String>,
}

impl VenueDiscovery {
    /// Creates a discovery runner. The credential is normalised first: an
    /// empty or placeholder key counts as absent, and discovery will then fail
    /// with [`DiscoveryError::Configuration`] without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the HTTP client cannot be constructed.
    pub fn new(api_key: Option<String>, settings: PlacesSettings) -> Result<Self, PlacesError> {
        let client = match normalize_api_key(api_key) {
            Some(key) => Some(PlacesClient::new(&key, settings)?),
            None => None,
        };
        Ok(Self {
            client,
            keywords: SEARCH_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        })
    }

    /// Replaces the keyword list (order is preserved).
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Discovers venues within `radius_km` of `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Configuration`] when no credential is
    /// configured. Every other failure is logged and skipped.
    pub async fn discover(
        &self,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<VenueCandidate>, DiscoveryError> {
        let Some(client) = &self.client else {
            return Err(DiscoveryError::Configuration);
        };

        tracing::info!(%origin, radius_km, "fetching venues from Places API");
        let radius_meters = radius_to_meters(radius_km);

        let mut seen: HashSet<String> = HashSet::new();
        let mut found: Vec<VenueCandidate> = Vec::new();

        for query in &self.keywords {
            let response = match client.text_search(query, origin, radius_meters).await {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!(query = %query, error = %e, "text search request failed");
                    continue;
                }
            };

            match response.status {
                ApiStatus::Ok => {}
                ApiStatus::ZeroResults => {
                    tracing::info!(query = %query, "no results for query");
                    continue;
                }
                ApiStatus::Other(status) => {
                    let message = response
                        .error_message
                        .as_deref()
                        .unwrap_or("No error message provided.");
                    tracing::error!(
                        query = %query,
                        status = %status,
                        error_message = message,
                        "Places API returned an error status"
                    );
                    continue;
                }
            }

            for summary in response.results {
                let Some(place_id) = summary.place_id.clone() else {
                    continue;
                };
                if seen.contains(&place_id) {
                    continue;
                }
                let Some(geometry) = &summary.geometry else {
                    tracing::debug!(place_id = %place_id, "search result has no geometry, skipping");
                    continue;
                };
                let coordinate = Coordinate {
                    lat: geometry.location.lat,
                    lng: geometry.location.lng,
                };

                let details = match client.place_details(&place_id).await {
                    Ok(d) => Some(d),
                    Err(e) => {
                        tracing::warn!(place_id = %place_id, error = %e, "details lookup failed, using search record");
                        None
                    }
                };

                found.push(merge_candidate(place_id.clone(), coordinate, &summary, details));
                seen.insert(place_id);
            }
        }

        let within = filter_within_radius(found, origin, radius_km);
        tracing::info!(
            count = within.len(),
            radius_km,
            "venues found within radius after filtering"
        );
        Ok(within)
    }
}

impl VenueSource for VenueDiscovery {
    async fn discover(
        &self,
        origin: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<VenueCandidate>, DiscoveryError> {
        VenueDiscovery::discover(self, origin, radius_km).await
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn radius_to_meters(radius_km: f64) -> u32 {
    (radius_km.max(0.0) * 1_000.0) as u32
}

/// Combines a search record with its (optional) details, details first.
fn merge_candidate(
    id: String,
    coordinate: Coordinate,
    summary: &PlaceSummary,
    details: Option<PlaceDetails>,
) -> VenueCandidate {
    let details = details.unwrap_or_default();

    let category_order = details.types.unwrap_or_else(|| summary.types.clone());
    let address = details
        .formatted_address
        .or_else(|| summary.formatted_address.clone())
        .or_else(|| summary.vicinity.clone())
        .unwrap_or_else(|| "Address not available".to_string());

    VenueCandidate {
        id,
        name: details
            .name
            .or_else(|| summary.name.clone())
            .unwrap_or_else(|| "Unknown Place".to_string()),
        coordinate,
        categories: category_order.iter().cloned().collect(),
        address,
        phone: details.formatted_phone_number,
        website: details.website,
        rating: details.rating.or(summary.rating),
        review_snippets: details
            .reviews
            .into_iter()
            .map(|r| r.text)
            .take(MAX_REVIEW_SNIPPETS)
            .collect(),
        opening_hours: details
            .opening_hours
            .map(|h| h.weekday_text)
            .unwrap_or_default(),
        distance_km: None,
        category_order,
    }
}

/// Keeps candidates within `radius_km` of `origin`, attaching the distance.
fn filter_within_radius(
    candidates: Vec<VenueCandidate>,
    origin: Coordinate,
    radius_km: f64,
) -> Vec<VenueCandidate> {
    candidates
        .into_iter()
        .filter_map(|mut c| {
            let d = distance_km(origin, c.coordinate);
            (d <= radius_km).then(|| {
                c.distance_km = Some(d);
                c
            })
        })
        .collect()
}
