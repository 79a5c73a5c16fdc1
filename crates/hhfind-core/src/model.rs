//! Domain records that flow through a single discovery → publish run.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Alert radius attached to every published deal.
pub const ALERT_RADIUS_KM: f64 = 1.0;

/// Minimum validity of a published deal, in hours.
pub const MIN_VALIDITY_HOURS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting latitudes outside `[-90, 90]` and
    /// longitudes outside `[-180, 180]` (NaN included).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when either component is out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
            Ok(Self { lat, lng })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lng })
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

impl FromStr for Coordinate {
    type Err = CoreError;

    /// Parses `"lat,lng"`, e.g. `"34.0522,-118.2437"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparsable = || CoreError::UnparsableCoordinate {
            input: s.to_string(),
        };
        let (lat, lng) = s.split_once(',').ok_or_else(unparsable)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| unparsable())?;
        let lng = lng.trim().parse::<f64>().map_err(|_| unparsable())?;
        Self::new(lat, lng)
    }
}

/// A place returned by a discovery query, before happy-hour inference.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueCandidate {
    /// Places API `place_id`; unique within one discovery run.
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    /// Places API `types`, e.g. `lodging`, `bar`, `restaurant`.
    pub categories: BTreeSet<String>,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    /// Most recent review texts, at most five.
    pub review_snippets: Vec<String>,
    /// Human-readable weekday opening hours.
    pub opening_hours: Vec<String>,
    /// Distance from the search origin. Set by the discovery radius filter.
    pub distance_km: Option<f64>,
    /// Category order as returned by the API; `categories` loses it.
    pub category_order: Vec<String>,
}

impl VenueCandidate {
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    #[must_use]
    pub fn has_any_category(&self, categories: &[&str]) -> bool {
        categories.iter().any(|c| self.has_category(c))
    }
}

/// Display classification of a venue, hotels first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenueKind {
    Hotel,
    Bar,
    Restaurant,
    Cafe,
    /// Any other first category, title-cased (`night_club` → `Night Club`).
    Other(String),
    /// No categories at all.
    Venue,
}

impl VenueKind {
    #[must_use]
    pub fn classify(candidate: &VenueCandidate) -> Self {
        if candidate.has_any_category(&["lodging", "hotel"]) {
            Self::Hotel
        } else if candidate.has_category("bar") {
            Self::Bar
        } else if candidate.has_category("restaurant") {
            Self::Restaurant
        } else if candidate.has_category("cafe") {
            Self::Cafe
        } else {
            candidate
                .category_order
                .first()
                .or_else(|| candidate.categories.iter().next())
                .map_or(Self::Venue, |first| Self::Other(title_case(first)))
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Hotel => "Hotel",
            Self::Bar => "Bar",
            Self::Restaurant => "Restaurant",
            Self::Cafe => "Cafe",
            Self::Other(label) => label,
            Self::Venue => "Venue",
        }
    }
}

fn title_case(raw: &str) -> String {
    raw.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A venue candidate after heuristic scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedVenue {
    pub candidate: VenueCandidate,
    pub offer_description: String,
    /// Always strictly positive.
    pub estimated_duration_hours: f64,
    pub has_explicit_mention: bool,
    pub venue_kind: VenueKind,
}

/// Canonical user-facing record of an inferred happy-hour offer.
///
/// Serialises to the published feed shape (`store_name`, `store_address`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(rename = "store_name")]
    pub venue_name: String,
    #[serde(rename = "store_address")]
    pub location: Coordinate,
    pub offer_details: String,
    #[serde(rename = "offer_validity_hours")]
    pub validity_hours: f64,
    pub alert_radius_km: f64,
    #[serde(rename = "provider")]
    pub source_confirmed: bool,
    pub venue_type: String,
}

/// State threaded through one workflow run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    pub origin: Coordinate,
    pub location_label: String,
    /// Sorted ascending by distance from `origin`.
    pub deals: Vec<Deal>,
    pub publish_status: Option<String>,
    pub error_message: Option<String>,
}

impl PipelineState {
    #[must_use]
    pub fn new(origin: Coordinate, location_label: impl Into<String>) -> Self {
        Self {
            origin,
            location_label: location_label.into(),
            deals: Vec::new(),
            publish_status: None,
            error_message: None,
        }
    }
}
