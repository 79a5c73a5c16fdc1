//! Resolving the search origin from flags or an interactive prompt.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use hhfind_core::{AppConfig, Coordinate, CoreError};
use hhfind_places::{
    GeocodeError, IpLocator, NominatimClient, PlacesClient, PlacesError, PlacesSettings,
};
use thiserror::Error;

use crate::effects::open_map;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("invalid coordinates: {0}; use 'latitude,longitude' (e.g. '34.0522,-118.2437')")]
    InvalidCoordinates(#[from] CoreError),

    #[error("could not find coordinates for address: {0}")]
    AddressNotFound(String),

    #[error("geocoding failed: {0}")]
    Geocode(#[source] GeocodeError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] PlacesError),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("location selection aborted")]
    Aborted,
}

/// Where the location came from, as selected by CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationRequest {
    Auto,
    Address(String),
    Coords(String),
    Interactive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub label: String,
}

pub struct LocationResolver<'a> {
    config: &'a AppConfig,
    nominatim: NominatimClient,
    open_maps: bool,
}

impl<'a> LocationResolver<'a> {
    /// # Errors
    ///
    /// Returns [`LocationError::Client`] if the geocoding client cannot be built.
    pub fn new(config: &'a AppConfig, open_maps: bool) -> Result<Self, LocationError> {
        Ok(Self {
            config,
            nominatim: NominatimClient::from_app_config(config)?,
            open_maps,
        })
    }

    /// # Errors
    ///
    /// Returns [`LocationError`] when the location cannot be determined or the
    /// user aborts the prompt.
    pub async fn resolve(&self, request: LocationRequest) -> Result<ResolvedLocation, LocationError> {
        match request {
            LocationRequest::Auto => self.auto().await,
            LocationRequest::Address(address) => self.from_address(&address).await,
            LocationRequest::Coords(text) => {
                let coordinate: Coordinate = text.parse()?;
                let label = self.describe_coordinates(coordinate).await;
                println!("Using coordinates: {coordinate} ({label})");
                Ok(ResolvedLocation { coordinate, label })
            }
            LocationRequest::Interactive => self.prompt().await,
        }
    }

    async fn auto(&self) -> Result<ResolvedLocation, LocationError> {
        println!("Attempting to detect your location automatically...");
        let location = IpLocator::from_app_config(self.config)?
            .locate_or_fallback(&self.config.fallback_location)
            .await;
        if location.is_fallback {
            println!(
                "Could not detect your location. Using default: {}",
                location.label
            );
        } else {
            println!("Location detected: {}", location.label);
        }
        Ok(ResolvedLocation {
            coordinate: location.coordinate,
            label: location.label,
        })
    }

    async fn from_address(&self, address: &str) -> Result<ResolvedLocation, LocationError> {
        println!("Searching for address: {address}");
        match self.nominatim.forward(address).await {
            Ok(place) => {
                println!("Found coordinates for '{address}': {}", place.coordinate);
                Ok(ResolvedLocation {
                    coordinate: place.coordinate,
                    label: place.formatted_address,
                })
            }
            Err(GeocodeError::NotFound { .. }) => {
                Err(LocationError::AddressNotFound(address.to_string()))
            }
            Err(e) => Err(LocationError::Geocode(e)),
        }
    }

    /// Human-readable label for explicit coordinates. Google reverse geocoding
    /// is used when a key is configured, Nominatim otherwise; if both fail the
    /// raw coordinates are used.
    async fn describe_coordinates(&self, at: Coordinate) -> String {
        if let Some(key) = &self.config.places_api_key {
            let settings = PlacesSettings::from_app_config(self.config);
            match PlacesClient::new(key, settings) {
                Ok(client) => match client.reverse_lookup(at).await {
                    Ok(place) => return place.formatted_address,
                    Err(e) => tracing::warn!(error = %e, "google reverse geocoding failed"),
                },
                Err(e) => tracing::warn!(error = %e, "could not build places client"),
            }
        }
        match self.nominatim.reverse(at).await {
            Ok(place) => place.formatted_address,
            Err(e) => {
                tracing::warn!(error = %e, "reverse geocoding failed, using raw coordinates");
                format!("Coordinates: {at}")
            }
        }
    }

    async fn prompt(&self) -> Result<ResolvedLocation, LocationError> {
        let theme = ColorfulTheme::default();
        let methods = [
            "Enter address/city name (we'll find coordinates)",
            "Enter latitude and longitude manually",
            "Use my current location (IP based)",
        ];

        loop {
            let choice = Select::with_theme(&theme)
                .with_prompt("How would you like to provide your location?")
                .items(&methods)
                .default(0)
                .interact_opt()?
                .ok_or(LocationError::Aborted)?;

            let picked = match choice {
                0 => self.prompt_address(&theme).await?,
                1 => self.prompt_coordinates(&theme).await?,
                _ => {
                    let location = self.auto().await?;
                    if self.open_maps {
                        open_map(location.coordinate);
                    }
                    println!(
                        "Detected location: {} ({})",
                        location.label, location.coordinate
                    );
                    Some(location)
                }
            };

            if let Some(location) = picked {
                let confirmed = Confirm::with_theme(&theme)
                    .with_prompt("Is this your desired location for the happy hour search?")
                    .default(true)
                    .interact()?;
                if confirmed {
                    return Ok(location);
                }
            }
            println!("Okay, let's try again.");
        }
    }

    /// `None` when the address could not be resolved; the caller re-prompts.
    async fn prompt_address(
        &self,
        theme: &ColorfulTheme,
    ) -> Result<Option<ResolvedLocation>, LocationError> {
        let address: String = Input::with_theme(theme)
            .with_prompt("Enter your address or city name")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("Please enter a valid address.")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        match self.from_address(address.trim()).await {
            Ok(location) => {
                println!("Location: {}", location.label);
                Ok(Some(location))
            }
            Err(LocationError::AddressNotFound(_)) => {
                println!("Could not find coordinates for that address. Please try again.");
                Ok(None)
            }
            Err(LocationError::Geocode(e)) => {
                tracing::warn!(error = %e, "address lookup failed");
                println!("Address lookup failed. Please try again with a different address.");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn prompt_coordinates(
        &self,
        theme: &ColorfulTheme,
    ) -> Result<Option<ResolvedLocation>, LocationError> {
        let lat: f64 = Input::with_theme(theme)
            .with_prompt("Enter latitude (e.g. 40.7128)")
            .validate_with(|v: &f64| {
                if (-90.0..=90.0).contains(v) {
                    Ok(())
                } else {
                    Err("Latitude must be between -90 and 90.")
                }
            })
            .interact_text()?;
        let lng: f64 = Input::with_theme(theme)
            .with_prompt("Enter longitude (e.g. -74.0060)")
            .validate_with(|v: &f64| {
                if (-180.0..=180.0).contains(v) {
                    Ok(())
                } else {
                    Err("Longitude must be between -180 and 180.")
                }
            })
            .interact_text()?;

        let coordinate = Coordinate::new(lat, lng)?;
        let label = match self.nominatim.reverse(coordinate).await {
            Ok(place) => {
                println!("This appears to be: {}", place.formatted_address);
                place.formatted_address
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not reverse geocode manual coordinates");
                println!("Coordinates: {coordinate}");
                format!("Manually entered coordinates: {coordinate}")
            }
        };
        Ok(Some(ResolvedLocation { coordinate, label }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_coordinate_text_maps_to_invalid_coordinates() {
        let err: LocationError = "abc".parse::<Coordinate>().unwrap_err().into();
        assert!(matches!(err, LocationError::InvalidCoordinates(_)));
        assert!(err.to_string().contains("latitude,longitude"));
    }

    #[test]
    fn address_not_found_message_names_the_address() {
        let err = LocationError::AddressNotFound("Atlantis".to_string());
        assert_eq!(
            err.to_string(),
            "could not find coordinates for address: Atlantis"
        );
    }
}
