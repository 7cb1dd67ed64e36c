use place_picker::{Coordinate, GeoSearchClient, GoogleMapsClient, SearchError};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const KEY: &str = "test-key";

fn client(server: &MockServer) -> GoogleMapsClient {
    GoogleMapsClient::new(reqwest::Client::new(), format!("{}/", server.uri()), KEY)
}

fn result(id: &str, name: &str, types: serde_json::Value) -> serde_json::Value {
    json!({
        "place_id": id,
        "name": name,
        "vicinity": "Whitehall, London",
        "types": types,
        "geometry": { "location": { "lat": 51.5033, "lng": -0.1276 } }
    })
}

#[tokio::test]
async fn nearby_search_sends_location_type_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("rankby", "distance"))
        .and(query_param("location", "51.5007,-0.1246"))
        .and(query_param("type", "cafe"))
        .and(query_param("key", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "next_page_token": "token-2",
            "results": [
                result("p1", "Cafe Nero", json!(["cafe", "point_of_interest"])),
                result("p2", "Lamp post", serde_json::Value::Null)
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .nearby_search(Coordinate::new(51.5007, -0.1246), Some("cafe"))
        .await
        .unwrap();

    assert_eq!(page.next_page_token.as_deref(), Some("token-2"));
    assert_eq!(page.places.len(), 2);
    assert!(page.places[0].has_category("point_of_interest"));
    assert_eq!(page.places[0].address.as_deref(), Some("Whitehall, London"));
    assert!(page.places[1].categories.is_empty());
}

#[tokio::test]
async fn continuation_passes_the_token_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .and(query_param("pagetoken", "Aap_uE+/token=="))
        .and(query_param("key", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [result("p3", "Gallery", json!(["point_of_interest"]))]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .nearby_search_continue("Aap_uE+/token==")
        .await
        .unwrap();

    assert_eq!(page.next_page_token, None);
    assert_eq!(page.places[0].id, "p3");
}

#[tokio::test]
async fn zero_results_is_an_empty_page() {
    let server = MockServer::start().await;
    Mock::given(path("/place/nearbysearch/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let page = client(&server)
        .nearby_search(Coordinate::new(0.0, 0.0), None)
        .await
        .unwrap();

    assert!(page.places.is_empty());
}

#[tokio::test]
async fn non_ok_status_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .nearby_search(Coordinate::new(0.0, 0.0), None)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SearchError::Provider {
            status: "REQUEST_DENIED".into(),
            message: Some("The provided API key is invalid.".into()),
        }
    );
}

#[tokio::test]
async fn http_failure_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server)
        .nearby_search(Coordinate::new(0.0, 0.0), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Transport { .. }));
}

#[tokio::test]
async fn reverse_geocode_takes_the_first_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("latlng", "51.5033,-0.1276"))
        .and(query_param("language", "pt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {
                    "place_id": "g1",
                    "types": ["street_address"],
                    "formatted_address": "10 Downing St, London SW1A 2AA, UK",
                    "geometry": { "location": { "lat": 51.5033, "lng": -0.1276 } }
                },
                {
                    "place_id": "g2",
                    "types": ["route"],
                    "formatted_address": "Downing St, London, UK",
                    "geometry": { "location": { "lat": 51.5034, "lng": -0.1277 } }
                }
            ]
        })))
        .mount(&server)
        .await;

    let place = client(&server)
        .reverse_geocode(Coordinate::new(51.5033, -0.1276), "pt")
        .await
        .unwrap()
        .expect("a place");

    assert_eq!(place.id, "g1");
    assert_eq!(
        place.name.as_deref(),
        Some("10 Downing St, London SW1A 2AA, UK")
    );
}

#[tokio::test]
async fn reverse_geocode_without_ok_status_is_none() {
    let server = MockServer::start().await;
    Mock::given(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "INVALID_REQUEST",
            "results": []
        })))
        .mount(&server)
        .await;

    let place = client(&server)
        .reverse_geocode(Coordinate::new(0.0, 0.0), "en")
        .await
        .unwrap();

    assert_eq!(place, None);
}
