//! Shared domain types, geodesic math, and configuration for hhfind.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod model;

pub use app_config::{AppConfig, FallbackLocation};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::distance_km;
pub use model::{
    Coordinate, Deal, EnrichedVenue, PipelineState, VenueCandidate, VenueKind, ALERT_RADIUS_KM,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("coordinate out of range: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("cannot parse coordinates \"{input}\": expected \"lat,lng\"")]
    UnparsableCoordinate { input: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
