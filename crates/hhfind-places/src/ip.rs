//! Best-effort location detection from the caller's public IP address.

use std::net::IpAddr;
use std::time::Duration;

use hhfind_core::{AppConfig, Coordinate, FallbackLocation};
use reqwest::{Client, Url};

use crate::error::{LocateError, PlacesError};
use crate::http::{build_http_client, build_url, get_json, parse_base_url};
use crate::types::{IpGeoResponse, IpLookupResponse};

/// Result of automatic detection. `is_fallback` is set when the configured
/// default location was used instead of a real lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocation {
    pub coordinate: Coordinate,
    pub label: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub is_fallback: bool,
}

impl IpLocation {
    #[must_use]
    pub fn from_fallback(fallback: &FallbackLocation) -> Self {
        Self {
            coordinate: fallback.coordinate,
            label: fallback.label.clone(),
            city: fallback.city.clone(),
            region: fallback.state.clone(),
            country: fallback.country.clone(),
            is_fallback: true,
        }
    }
}

pub struct IpLocator {
    client: Client,
    lookup_url: Url,
    geo_base_url: Url,
    lookup_timeout: Duration,
    geo_timeout: Duration,
}

impl IpLocator {
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the HTTP client cannot be built or either
    /// URL is invalid.
    pub fn new(
        lookup_url: &str,
        geo_base_url: &str,
        user_agent: &str,
        lookup_timeout: Duration,
        geo_timeout: Duration,
    ) -> Result<Self, PlacesError> {
        Ok(Self {
            client: build_http_client(user_agent)?,
            lookup_url: parse_base_url(lookup_url)?,
            geo_base_url: parse_base_url(geo_base_url)?,
            lookup_timeout,
            geo_timeout,
        })
    }

    /// # Errors
    ///
    /// Same as [`IpLocator::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::new(
            &config.ip_lookup_url,
            &config.ip_geo_base_url,
            &config.user_agent,
            Duration::from_secs(config.ip_lookup_timeout_secs),
            Duration::from_secs(config.ip_geo_timeout_secs),
        )
    }

    /// Detects the caller's location, falling back to `fallback` on any failure.
    pub async fn locate_or_fallback(&self, fallback: &FallbackLocation) -> IpLocation {
        match self.locate().await {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!(error = %e, fallback = %fallback.label, "IP geolocation failed, using default location");
                IpLocation::from_fallback(fallback)
            }
        }
    }

    /// Detects the caller's public IP and geolocates it.
    ///
    /// # Errors
    ///
    /// - [`LocateError::NonPublicAddress`] if the lookup yields a private,
    ///   loopback, or unparsable address.
    /// - [`LocateError::Service`] if the geolocation service flags an error.
    /// - [`LocateError::MissingCoordinates`] if it omits latitude/longitude.
    /// - [`LocateError::Places`] on transport or decoding failure.
    pub async fn locate(&self) -> Result<IpLocation, LocateError> {
        let ip = self.public_ip().await?;
        self.geolocate(ip).await
    }

    async fn public_ip(&self) -> Result<IpAddr, LocateError> {
        let url = build_url(&self.lookup_url, "", &[("format", "json")])?;
        let response: IpLookupResponse =
            get_json(&self.client, url, self.lookup_timeout, "ip lookup").await?;
        let ip: IpAddr = response
            .ip
            .trim()
            .parse()
            .map_err(|_| LocateError::NonPublicAddress(response.ip.clone()))?;
        if !is_public_ip(ip) {
            return Err(LocateError::NonPublicAddress(ip.to_string()));
        }
        Ok(ip)
    }

    async fn geolocate(&self, ip: IpAddr) -> Result<IpLocation, LocateError> {
        let url = build_url(&self.geo_base_url, &format!("{ip}/json/"), &[])?;
        let response: IpGeoResponse =
            get_json(&self.client, url, self.geo_timeout, &format!("ip geolocation({ip})")).await?;
        if response.error {
            return Err(LocateError::Service(
                response.reason.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        let (Some(lat), Some(lng)) = (response.latitude, response.longitude) else {
            return Err(LocateError::MissingCoordinates(ip.to_string()));
        };
        let coordinate =
            Coordinate::new(lat, lng).map_err(|_| LocateError::MissingCoordinates(ip.to_string()))?;

        let city = response.city.unwrap_or_else(|| "Unknown".to_string());
        let region = response.region.unwrap_or_else(|| "Unknown".to_string());
        let country = response.country_name.unwrap_or_else(|| "Unknown".to_string());
        tracing::info!(%ip, %coordinate, city = %city, "detected location from IP");
        Ok(IpLocation {
            coordinate,
            label: format!("{city}, {region}, {country}"),
            city,
            region,
            country,
            is_fallback: false,
        })
    }
}

/// Whether an address is routable on the public internet.
#[must_use]
pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            // 100.64.0.0/10 carrier-grade NAT
            let shared = a == 100 && (64..128).contains(&b);
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || shared)
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            let unique_local = (first & 0xfe00) == 0xfc00;
            let link_local = (first & 0xffc0) == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || unique_local || link_local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn private_and_special_v4_are_not_public() {
        for s in [
            "10.0.0.1",
            "172.16.5.4",
            "192.168.1.1",
            "127.0.0.1",
            "169.254.1.1",
            "0.0.0.0",
            "100.64.0.1",
            "192.0.2.1",
        ] {
            assert!(!is_public_ip(ip(s)), "{s} should not be public");
        }
    }

    #[test]
    fn routable_v4_is_public() {
        assert!(is_public_ip(ip("8.8.8.8")));
        assert!(is_public_ip(ip("100.128.0.1")));
    }

    #[test]
    fn v6_classification() {
        assert!(!is_public_ip(ip("::1")));
        assert!(!is_public_ip(ip("fd12:3456::1")));
        assert!(!is_public_ip(ip("fe80::1")));
        assert!(is_public_ip(ip("2001:4860:4860::8888")));
    }

    #[test]
    fn fallback_location_is_flagged() {
        let loc = IpLocation::from_fallback(&FallbackLocation::default());
        assert!(loc.is_fallback);
        assert_eq!(loc.city, "Chennai");
        assert_eq!(loc.label, "Chennai, Tamil Nadu, India (Default)");
    }
}
