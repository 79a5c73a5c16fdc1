//! Google Places discovery, geocoding, and IP geolocation clients.

pub mod client;
pub mod discovery;
pub mod error;
pub mod geocode;
mod http;
pub mod ip;
pub mod types;

pub use client::{PlacesClient, PlacesSettings};
pub use discovery::{VenueDiscovery, VenueSource, SEARCH_KEYWORDS};
pub use error::{DiscoveryError, GeocodeError, LocateError, PlacesError};
pub use geocode::{GeocodedPlace, NominatimClient};
pub use ip::{is_public_ip, IpLocation, IpLocator};
