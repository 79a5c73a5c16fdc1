use std::path::PathBuf;

use crate::app_config::{AppConfig, FallbackLocation};
use crate::model::Coordinate;
use crate::ConfigError;

/// Value shipped in old `.env` templates; treated the same as an unset key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_GOOGLE_PLACES_API_KEY_HERE";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Normalise a raw credential: empty strings and the placeholder become `None`.
#[must_use]
pub fn normalize_api_key(raw: Option<String>) -> Option<String> {
    raw.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup is injected so tests can drive this
/// with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_timeout_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }
        Ok(secs)
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let places_api_key = normalize_api_key(lookup("GOOGLE_PLACES_API_KEY").ok());
    let log_level = or_default("HHFIND_LOG_LEVEL", "info,reqwest=warn,hyper=warn");

    let search_radius_km = parse_f64("HHFIND_SEARCH_RADIUS_KM", "5.0")?;
    if !search_radius_km.is_finite() || search_radius_km <= 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HHFIND_SEARCH_RADIUS_KM".to_string(),
            reason: format!("radius must be a positive number of kilometres, got {search_radius_km}"),
        });
    }

    let places_base_url = or_default(
        "HHFIND_PLACES_BASE_URL",
        "https://maps.googleapis.com/maps/api/",
    );
    let nominatim_base_url = or_default(
        "HHFIND_NOMINATIM_BASE_URL",
        "https://nominatim.openstreetmap.org/",
    );
    let ip_lookup_url = or_default("HHFIND_IP_LOOKUP_URL", "https://api.ipify.org/");
    let ip_geo_base_url = or_default("HHFIND_IP_GEO_BASE_URL", "https://ipapi.co/");
    let user_agent = or_default("HHFIND_USER_AGENT", "hhfind/0.1 (happy-hour-finder)");

    let text_search_timeout_secs = parse_timeout_secs("HHFIND_TEXT_SEARCH_TIMEOUT_SECS", "15")?;
    let details_timeout_secs = parse_timeout_secs("HHFIND_DETAILS_TIMEOUT_SECS", "10")?;
    let geocode_timeout_secs = parse_timeout_secs("HHFIND_GEOCODE_TIMEOUT_SECS", "10")?;
    let ip_lookup_timeout_secs = parse_timeout_secs("HHFIND_IP_LOOKUP_TIMEOUT_SECS", "5")?;
    let ip_geo_timeout_secs = parse_timeout_secs("HHFIND_IP_GEO_TIMEOUT_SECS", "10")?;

    let fallback_location = build_fallback_location(&lookup)?;

    let sound_file = PathBuf::from(or_default("HHFIND_SOUND_FILE", "whistle1.mp3"));
    let sound_command: Vec<String> = or_default("HHFIND_SOUND_COMMAND", default_sound_command())
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if sound_command.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "HHFIND_SOUND_COMMAND".to_string(),
            reason: "player command must not be empty".to_string(),
        });
    }

    Ok(AppConfig {
        places_api_key,
        log_level,
        search_radius_km,
        places_base_url,
        nominatim_base_url,
        ip_lookup_url,
        ip_geo_base_url,
        user_agent,
        text_search_timeout_secs,
        details_timeout_secs,
        geocode_timeout_secs,
        ip_lookup_timeout_secs,
        ip_geo_timeout_secs,
        fallback_location,
        sound_file,
        sound_command,
    })
}

/// Overlay `HHFIND_FALLBACK_LAT` / `_LNG` / `_LABEL` onto the built-in default.
///
/// Latitude and longitude must be given together.
fn build_fallback_location<F>(lookup: &F) -> Result<FallbackLocation, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let mut fallback = FallbackLocation::default();

    match (lookup("HHFIND_FALLBACK_LAT"), lookup("HHFIND_FALLBACK_LNG")) {
        (Ok(lat), Ok(lng)) => {
            let parse = |var: &str, raw: &str| -> Result<f64, ConfigError> {
                raw.trim()
                    .parse::<f64>()
                    .map_err(|e| ConfigError::InvalidEnvVar {
                        var: var.to_string(),
                        reason: e.to_string(),
                    })
            };
            let lat = parse("HHFIND_FALLBACK_LAT", &lat)?;
            let lng = parse("HHFIND_FALLBACK_LNG", &lng)?;
            fallback.coordinate =
                Coordinate::new(lat, lng).map_err(|e| ConfigError::InvalidEnvVar {
                    var: "HHFIND_FALLBACK_LAT".to_string(),
                    reason: e.to_string(),
                })?;
            // A custom coordinate invalidates the Chennai address parts.
            fallback.label = format!("{} (Default)", fallback.coordinate);
            fallback.city = "Unknown".to_string();
            fallback.state = "Unknown".to_string();
            fallback.country = "Unknown".to_string();
        }
        (Ok(_), Err(_)) => return Err(ConfigError::MissingEnvVar("HHFIND_FALLBACK_LNG".into())),
        (Err(_), Ok(_)) => return Err(ConfigError::MissingEnvVar("HHFIND_FALLBACK_LAT".into())),
        (Err(_), Err(_)) => {}
    }

    if let Ok(label) = lookup("HHFIND_FALLBACK_LABEL") {
        fallback.label = label;
    }

    Ok(fallback)
}

fn default_sound_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "afplay"
    } else {
        "mpg123 -q"
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
