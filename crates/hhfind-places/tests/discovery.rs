//! Integration tests for `VenueDiscovery` against a wiremock Places API.

use std::time::Duration;

use hhfind_core::Coordinate;
use hhfind_places::{DiscoveryError, PlacesSettings, VenueDiscovery};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORIGIN: Coordinate = Coordinate {
    lat: 40.7128,
    lng: -74.0060,
};

fn settings(base_url: &str) -> PlacesSettings {
    PlacesSettings {
        base_url: base_url.to_string(),
        user_agent: "hhfind-test/0.1".to_string(),
        text_search_timeout: Duration::from_secs(5),
        details_timeout: Duration::from_secs(5),
        geocode_timeout: Duration::from_secs(5),
    }
}

fn discovery(server: &MockServer, keywords: &[&str]) -> VenueDiscovery {
    VenueDiscovery::new(Some("test-key".to_string()), settings(&server.uri()))
        .expect("discovery construction should not fail")
        .with_keywords(keywords.iter().copied())
}

fn search_result(place_id: &str, name: &str, lat: f64, lng: f64, types: &[&str]) -> serde_json::Value {
    json!({
        "place_id": place_id,
        "name": name,
        "geometry": { "location": { "lat": lat, "lng": lng } },
        "types": types,
        "vicinity": "Somewhere nearby",
        "rating": 4.1
    })
}

async fn mount_search(server: &MockServer, query: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/place/textsearch/json"))
        .and(query_param("query", query))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_details(server: &MockServer, place_id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .and(query_param("place_id", place_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn same_place_from_two_queries_is_fetched_and_returned_once() {
    let server = MockServer::start().await;
    let results = json!({
        "status": "OK",
        "results": [search_result("p1", "The Tap", 40.7150, -74.0050, &["bar"])]
    });
    mount_search(&server, "bar", results.clone()).await;
    mount_search(&server, "pub", results).await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .and(query_param("place_id", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": {
                "name": "The Tap Room",
                "formatted_address": "12 Main St, New York, NY",
                "types": ["bar", "restaurant"],
                "formatted_phone_number": "(212) 555-0100",
                "reviews": [{ "text": "Great happy hour special!" }],
                "opening_hours": { "weekday_text": ["Monday: 4:00 PM - 2:00 AM"] }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let venues = discovery(&server, &["bar", "pub"])
        .discover(ORIGIN, 5.0)
        .await
        .expect("discovery should succeed");

    assert_eq!(venues.len(), 1);
    let venue = &venues[0];
    assert_eq!(venue.id, "p1");
    assert_eq!(venue.name, "The Tap Room");
    assert_eq!(venue.address, "12 Main St, New York, NY");
    assert!(venue.has_category("restaurant"));
    assert_eq!(venue.review_snippets, vec!["Great happy hour special!"]);
    assert_eq!(venue.opening_hours.len(), 1);
    assert!(venue.distance_km.is_some());
}

#[tokio::test]
async fn zero_results_and_error_statuses_are_skipped() {
    let server = MockServer::start().await;
    mount_search(&server, "bar", json!({ "status": "ZERO_RESULTS", "results": [] })).await;
    mount_search(
        &server,
        "pub",
        json!({ "status": "OVER_QUERY_LIMIT", "results": [], "error_message": "quota" }),
    )
    .await;
    mount_search(
        &server,
        "lounge",
        json!({
            "status": "OK",
            "results": [search_result("p2", "Sky Lounge", 40.7130, -74.0070, &["bar"])]
        }),
    )
    .await;
    mount_details(&server, "p2", json!({ "status": "OK", "result": {} })).await;

    let venues = discovery(&server, &["bar", "pub", "lounge"])
        .discover(ORIGIN, 5.0)
        .await
        .expect("discovery should succeed");

    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].name, "Sky Lounge");
}

#[tokio::test]
async fn failed_query_does_not_abort_later_queries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/textsearch/json"))
        .and(query_param("query", "bar"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/textsearch/json"))
        .and(query_param("query", "pub"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_search(
        &server,
        "brewery",
        json!({
            "status": "OK",
            "results": [search_result("p3", "Hop House", 40.7140, -74.0040, &["bar"])]
        }),
    )
    .await;
    mount_details(&server, "p3", json!({ "status": "OK", "result": {} })).await;

    let venues = discovery(&server, &["bar", "pub", "brewery"])
        .discover(ORIGIN, 5.0)
        .await
        .expect("discovery should succeed");

    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].id, "p3");
}

#[tokio::test]
async fn details_failure_falls_back_to_search_record() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "bar",
        json!({
            "status": "OK",
            "results": [
                search_result("p4", "Basic Bar", 40.7130, -74.0060, &["bar"]),
                search_result("p5", "Other Bar", 40.7135, -74.0060, &["bar"])
            ]
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .and(query_param("place_id", "p4"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_details(&server, "p5", json!({ "status": "NOT_FOUND" })).await;

    let venues = discovery(&server, &["bar"])
        .discover(ORIGIN, 5.0)
        .await
        .expect("discovery should succeed");

    assert_eq!(venues.len(), 2);
    assert_eq!(venues[0].name, "Basic Bar");
    assert_eq!(venues[0].address, "Somewhere nearby");
    assert_eq!(venues[0].rating, Some(4.1));
    assert_eq!(venues[1].name, "Other Bar");
    assert!(venues[1].review_snippets.is_empty());
}

#[tokio::test]
async fn results_without_id_or_geometry_are_ignored() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "bar",
        json!({
            "status": "OK",
            "results": [
                { "name": "No Id", "geometry": { "location": { "lat": 40.7128, "lng": -74.006 } } },
                { "place_id": "p6", "name": "No Geometry" }
            ]
        }),
    )
    .await;

    let venues = discovery(&server, &["bar"])
        .discover(ORIGIN, 5.0)
        .await
        .expect("discovery should succeed");

    assert!(venues.is_empty());
}

#[tokio::test]
async fn venues_outside_radius_are_dropped() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "bar",
        json!({
            "status": "OK",
            "results": [
                search_result("near", "Near Bar", 40.7150, -74.0050, &["bar"]),
                search_result("far", "Far Bar", 40.8500, -74.0060, &["bar"])
            ]
        }),
    )
    .await;
    mount_details(&server, "near", json!({ "status": "OK", "result": {} })).await;
    mount_details(&server, "far", json!({ "status": "OK", "result": {} })).await;

    let venues = discovery(&server, &["bar"])
        .discover(ORIGIN, 2.0)
        .await
        .expect("discovery should succeed");

    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].id, "near");
    let distance = venues[0].distance_km.expect("distance should be attached");
    assert!(distance <= 2.0);
}

#[tokio::test]
async fn search_request_carries_location_and_radius_in_meters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/textsearch/json"))
        .and(query_param("query", "wine bar"))
        .and(query_param("location", "40.7128,-74.006"))
        .and(query_param("radius", "1500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS" })))
        .expect(1)
        .mount(&server)
        .await;

    let venues = discovery(&server, &["wine bar"])
        .discover(ORIGIN, 1.5)
        .await
        .expect("discovery should succeed");
    assert!(venues.is_empty());
}

#[tokio::test]
async fn placeholder_key_fails_without_any_request() {
    let server = MockServer::start().await;
    let discovery = VenueDiscovery::new(
        Some("YOUR_GOOGLE_PLACES_API_KEY_HERE".to_string()),
        settings(&server.uri()),
    )
    .expect("discovery construction should not fail");

    let result = discovery.discover(ORIGIN, 5.0).await;

    assert!(matches!(result, Err(DiscoveryError::Configuration)));
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "no HTTP request may be issued");
}

#[tokio::test]
async fn empty_key_is_treated_as_missing() {
    let server = MockServer::start().await;
    let discovery = VenueDiscovery::new(Some("   ".to_string()), settings(&server.uri()))
        .expect("discovery construction should not fail");
    assert!(!discovery.is_configured());
    assert!(matches!(
        discovery.discover(ORIGIN, 5.0).await,
        Err(DiscoveryError::Configuration)
    ));
}
