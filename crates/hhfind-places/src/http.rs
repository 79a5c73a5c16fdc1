//! Request plumbing shared by every client in this crate.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;

/// Build the shared `reqwest::Client`. Timeouts are applied per request
/// because each endpoint has its own budget.
pub(crate) fn build_http_client(user_agent: &str) -> Result<Client, PlacesError> {
    Ok(Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .user_agent(user_agent)
        .build()?)
}

/// Parse a base URL, ensuring it ends with exactly one slash so that
/// [`Url::join`] appends endpoint paths instead of replacing the last segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, PlacesError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Join an endpoint path onto a base URL and append query pairs.
pub(crate) fn build_url(
    base: &Url,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<Url, PlacesError> {
    let mut url = base
        .join(endpoint)
        .map_err(|e| PlacesError::InvalidBaseUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

/// Sends a GET request with the given timeout, asserts a 2xx status, and
/// parses the body as `T`.
///
/// The request URL carries the API key, so it is stripped from every
/// transport error and `context` names the call instead.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    timeout: Duration,
    context: &str,
) -> Result<T, PlacesError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(reqwest::Error::without_url)?;
    let response = response
        .error_for_status()
        .map_err(reqwest::Error::without_url)?;
    let body = response
        .text()
        .await
        .map_err(reqwest::Error::without_url)?;
    serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("https://maps.googleapis.com/maps/api").unwrap();
        assert_eq!(url.as_str(), "https://maps.googleapis.com/maps/api/");
    }

    #[test]
    fn parse_base_url_collapses_trailing_slashes() {
        let url = parse_base_url("https://ipapi.co//").unwrap();
        assert_eq!(url.as_str(), "https://ipapi.co/");
    }

    #[test]
    fn parse_base_url_rejects_garbage() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(PlacesError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn build_url_joins_endpoint_and_encodes_params() {
        let base = parse_base_url("https://maps.googleapis.com/maps/api").unwrap();
        let url = build_url(
            &base,
            "place/textsearch/json",
            &[("query", "hotel bar"), ("location", "40.7128,-74.006")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/textsearch/json?query=hotel+bar&location=40.7128%2C-74.006"
        );
    }

    #[test]
    fn build_url_without_params_has_no_query() {
        let base = parse_base_url("https://api.ipify.org").unwrap();
        let url = build_url(&base, "", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.ipify.org/");
    }
}
