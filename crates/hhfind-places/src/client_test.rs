use super::*;

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::new(
        "test-key",
        PlacesSettings {
            base_url: base_url.to_string(),
            user_agent: "hhfind-test/0.1".to_string(),
            text_search_timeout: Duration::from_secs(5),
            details_timeout: Duration::from_secs(5),
            geocode_timeout: Duration::from_secs(5),
        },
    )
    .expect("client construction should not fail")
}

#[test]
fn build_url_appends_key_last() {
    let client = test_client("https://maps.googleapis.com/maps/api");
    let url = client
        .build_url("place/details/json", &[("place_id", "abc")])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://maps.googleapis.com/maps/api/place/details/json?place_id=abc&key=test-key"
    );
}

#[test]
fn build_url_encodes_query_text() {
    let client = test_client("https://maps.googleapis.com/maps/api/");
    let url = client
        .build_url("place/textsearch/json", &[("query", "restaurant with happy hour")])
        .unwrap();
    assert!(
        url.as_str().contains("query=restaurant+with+happy+hour"),
        "query should be form-encoded: {url}"
    );
}

#[test]
fn new_rejects_invalid_base_url() {
    let result = PlacesClient::new(
        "k",
        PlacesSettings {
            base_url: "::not a url::".to_string(),
            user_agent: "ua".to_string(),
            text_search_timeout: Duration::from_secs(1),
            details_timeout: Duration::from_secs(1),
            geocode_timeout: Duration::from_secs(1),
        },
    );
    assert!(matches!(result, Err(PlacesError::InvalidBaseUrl { .. })));
}

#[test]
fn detail_fields_cover_everything_discovery_reads() {
    for field in [
        "name",
        "formatted_address",
        "rating",
        "opening_hours",
        "website",
        "formatted_phone_number",
        "reviews",
        "types",
    ] {
        assert!(DETAIL_FIELDS.split(',').any(|f| f == field), "{field} missing");
    }
}
