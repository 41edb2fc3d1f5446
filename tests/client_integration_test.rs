//! Integration tests for the service client against a stubbed order
//! service: envelope unwrapping, error mapping, and query construction.

mod common;

use assert_matches::assert_matches;
use common::{persisted_order, TestService};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use dome_console::{
    directory::LocationDirectory,
    search::{OrderSearch, SearchFilters},
    shipper::ShipperResolver,
    ConsoleError, TokenStore,
};

#[tokio::test]
async fn shipper_lookup_resolves_the_candidate() {
    let service = TestService::start().await;
    service.mount_shipper("791234").await;

    let resolver = ShipperResolver::new(service.client());
    let shipper = resolver.resolve("791234").await.unwrap();
    assert_eq!(shipper.id, "791234");
    assert_eq!(shipper.name, "Brownsley Br Nyar Shop");
    assert_eq!(shipper.city_name, "Mandalay");
}

#[tokio::test]
async fn missing_shipper_is_a_typed_not_found() {
    let service = TestService::start().await;
    Mock::given(method("GET"))
        .and(path("/shipper/000000"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&service.server)
        .await;

    let resolver = ShipperResolver::new(service.client());
    let err = resolver.resolve("000000").await.unwrap_err();
    assert_matches!(err, ConsoleError::NotFound(msg) if msg.contains("000000"));
}

#[tokio::test]
async fn unsuccessful_envelope_surfaces_the_server_message() {
    let service = TestService::start().await;
    Mock::given(method("GET"))
        .and(path("/shipper/791234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Shipper record is suspended."
        })))
        .mount(&service.server)
        .await;

    let err = service.client().get_shipper("791234").await.unwrap_err();
    assert_matches!(err, ConsoleError::Service(msg) if msg == "Shipper record is suspended.");
}

#[tokio::test]
async fn directory_load_degrades_to_empty_lists_on_failure() {
    let service = TestService::start().await;
    Mock::given(method("GET"))
        .and(path("/order/state/get"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&service.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/order/city/get"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&service.server)
        .await;

    let directory = LocationDirectory::load(&service.client()).await;
    assert!(directory.states().is_empty());
    assert!(directory.cities().is_empty());
}

#[tokio::test]
async fn directory_load_parses_city_fees() {
    let service = TestService::start().await;
    service.mount_directories().await;

    let directory = LocationDirectory::load(&service.client()).await;
    assert_eq!(directory.states().len(), 2);
    let yangon = directory.city(4).unwrap();
    assert_eq!(yangon.state_id, 1);
    assert!(yangon.fee.is_some());
    // cascade data is queryable straight from the cache
    assert_eq!(directory.cities_for_state(1, "than").len(), 1);
}

#[tokio::test]
async fn multi_id_search_issues_one_batch_query() {
    let service = TestService::start().await;
    Mock::given(method("GET"))
        .and(path("/order/search"))
        .and(query_param("trackingIds", "A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [persisted_order("A1"), persisted_order("A2"), persisted_order("A3")]
        })))
        .expect(1)
        .mount(&service.server)
        .await;

    let filters = SearchFilters {
        tracking_input: Some("A1, A2 A3".to_string()),
        ..SearchFilters::default()
    };
    let orders = OrderSearch::new(service.client())
        .search(&filters)
        .await
        .unwrap();
    assert_eq!(orders.len(), 3);

    // exactly one request hit the search endpoint, carrying all three ids
    let requests = service.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or_default();
    assert!(query.contains("trackingIds=A2"));
    assert!(query.contains("trackingIds=A3"));
    assert!(!query.contains("trackingId="));
}

#[tokio::test]
async fn single_id_search_uses_exact_match() {
    let service = TestService::start().await;
    Mock::given(method("GET"))
        .and(path("/order/search"))
        .and(query_param("trackingId", "A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [persisted_order("A1")]
        })))
        .expect(1)
        .mount(&service.server)
        .await;

    let filters = SearchFilters {
        tracking_input: Some("A1".to_string()),
        ..SearchFilters::default()
    };
    let orders = OrderSearch::new(service.client())
        .search(&filters)
        .await
        .unwrap();
    assert_eq!(orders[0].tracking_id, "A1");
}

#[tokio::test]
async fn empty_filters_fetch_the_recent_list() {
    let service = TestService::start().await;
    Mock::given(method("GET"))
        .and(path("/order"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [persisted_order("DOME001"), persisted_order("DOME002")]
        })))
        .expect(1)
        .mount(&service.server)
        .await;

    let orders = OrderSearch::new(service.client())
        .search(&SearchFilters::default())
        .await
        .unwrap();
    assert_eq!(orders.len(), 2);
}

#[tokio::test]
async fn missing_measurement_is_a_typed_not_found() {
    let service = TestService::start().await;
    Mock::given(method("GET"))
        .and(path("/oswm/DOME001"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&service.server)
        .await;

    let err = service.client().get_measurement("DOME001").await.unwrap_err();
    assert_matches!(err, ConsoleError::NotFound(_));
}

#[tokio::test]
async fn bearer_token_is_attached_when_present() {
    let service = TestService::start().await;
    Mock::given(method("GET"))
        .and(path("/order"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&service.server)
        .await;

    let tokens = TokenStore::new();
    tokens.set("tok-123");
    let client = service.client_with_tokens(tokens.clone());
    client.recent_orders().await.unwrap();

    // logout teardown removes the header from subsequent calls
    tokens.clear();
    Mock::given(method("GET"))
        .and(path("/order/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&service.server)
        .await;
    let params = vec![("name".to_string(), "x".to_string())];
    client.search_orders(&params).await.unwrap();
    let requests = service.server.received_requests().await.unwrap();
    assert!(requests
        .last()
        .unwrap()
        .headers
        .get("authorization")
        .is_none());
}

#[tokio::test]
async fn transport_failure_maps_to_network_error() {
    let service = TestService::start().await;
    let client = service.client();
    // kill the server so the connection is refused
    drop(service);

    let err = client.recent_orders().await.unwrap_err();
    assert_matches!(err, ConsoleError::Network(_));
}
