use crate::model::Coordinate;

/// Location used when automatic IP geolocation cannot produce coordinates.
///
/// The default is not geographically meaningful; override it with the
/// `HHFIND_FALLBACK_*` variables.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackLocation {
    pub coordinate: Coordinate,
    pub label: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Default for FallbackLocation {
    fn default() -> Self {
        Self {
            coordinate: Coordinate {
                lat: 13.067_439,
                lng: 80.237_617,
            },
            label: "Chennai, Tamil Nadu, India (Default)".to_string(),
            city: "Chennai".to_string(),
            state: "Tamil Nadu".to_string(),
            country: "India".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Google Places / Geocoding credential. `None` when unset, empty, or
    /// still the placeholder value.
    pub places_api_key: Option<String>,
    pub log_level: String,
    pub search_radius_km: f64,
    pub places_base_url: String,
    pub nominatim_base_url: String,
    pub ip_lookup_url: String,
    pub ip_geo_base_url: String,
    pub user_agent: String,
    pub text_search_timeout_secs: u64,
    pub details_timeout_secs: u64,
    pub geocode_timeout_secs: u64,
    pub ip_lookup_timeout_secs: u64,
    pub ip_geo_timeout_secs: u64,
    pub fallback_location: FallbackLocation,
    pub sound_file: std::path::PathBuf,
    /// Player program followed by its arguments; the sound file is appended.
    pub sound_command: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("search_radius_km", &self.search_radius_km)
            .field("places_base_url", &self.places_base_url)
            .field("nominatim_base_url", &self.nominatim_base_url)
            .field("ip_lookup_url", &self.ip_lookup_url)
            .field("ip_geo_base_url", &self.ip_geo_base_url)
            .field("user_agent", &self.user_agent)
            .field("text_search_timeout_secs", &self.text_search_timeout_secs)
            .field("details_timeout_secs", &self.details_timeout_secs)
            .field("geocode_timeout_secs", &self.geocode_timeout_secs)
            .field("ip_lookup_timeout_secs", &self.ip_lookup_timeout_secs)
            .field("ip_geo_timeout_secs", &self.ip_geo_timeout_secs)
            .field("fallback_location", &self.fallback_location)
            .field("sound_file", &self.sound_file)
            .field("sound_command", &self.sound_command)
            .finish()
    }
}
