use thiserror::Error;

/// Errors returned by the Places / Geocoding HTTP clients.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a status other than `OK` (or `ZERO_RESULTS`
    /// where that is acceptable).
    #[error("Places API status {status}: {message}")]
    ApiStatus { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Fatal discovery failures. Per-query failures never surface here.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(
        "Google Places API key is not set or is invalid; set GOOGLE_PLACES_API_KEY in your environment or .env file"
    )]
    Configuration,
}

/// Errors from forward/reverse geocoding.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no geocoding result for {query}")]
    NotFound { query: String },

    #[error(transparent)]
    Places(#[from] PlacesError),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(e: reqwest::Error) -> Self {
        Self::Places(PlacesError::Http(e))
    }
}

/// Errors from automatic IP geolocation. Callers normally fall back to the
/// configured default location instead of surfacing these.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error(transparent)]
    Places(#[from] PlacesError),

    #[error("address {0} is not a public IP")]
    NonPublicAddress(String),

    #[error("IP geolocation returned no coordinates for {0}")]
    MissingCoordinates(String),

    #[error("IP geolocation service error: {0}")]
    Service(String),
}

impl From<reqwest::Error> for LocateError {
    fn from(e: reqwest::Error) -> Self {
        Self::Places(PlacesError::Http(e))
    }
}
