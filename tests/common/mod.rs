use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dome_console::{config::AppConfig, ServiceClient, TokenStore};

/// Harness wrapping a stubbed order service.
pub struct TestService {
    pub server: MockServer,
}

impl TestService {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.server.uri(),
            api_token: None,
            request_timeout_secs: 5,
            environment: "test".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            label_output_dir: "labels".to_string(),
        }
    }

    pub fn client(&self) -> ServiceClient {
        ServiceClient::new(&self.config(), TokenStore::new()).expect("test client")
    }

    pub fn client_with_tokens(&self, tokens: TokenStore) -> ServiceClient {
        ServiceClient::new(&self.config(), tokens).expect("test client")
    }

    /// Mounts the standard state/city directories used by most flows.
    pub async fn mount_directories(&self) {
        Mock::given(method("GET"))
            .and(path("/order/state/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    { "id": 1, "name": "Yangon Region" },
                    { "id": 2, "name": "Mandalay Region" }
                ]
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/order/city/get"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    { "id": 4, "name": "Yangon", "stateId": 1, "fee": 3500.0 },
                    { "id": 5, "name": "Thanlyin", "stateId": 1 },
                    { "id": 7, "name": "Mandalay", "stateId": 2, "fee": 18500.0 }
                ]
            })))
            .mount(&self.server)
            .await;
    }

    /// Mounts a shipper lookup for `shipper_id`.
    pub async fn mount_shipper(&self, shipper_id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/shipper/{}", shipper_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "id": shipper_id,
                    "name": "Brownsley Br Nyar Shop",
                    "phone": "+959788889337",
                    "cityName": "Mandalay",
                    "stateName": "Mandalay Region"
                }
            })))
            .mount(&self.server)
            .await;
    }
}

/// A persisted order body as the service returns it.
pub fn persisted_order(tracking_id: &str) -> serde_json::Value {
    json!({
        "id": 12,
        "trackingId": tracking_id,
        "cusName": "Brown kid",
        "cusPhone": "09123456",
        "cusAddress": "115-70B",
        "cod": 1000000.0,
        "totalCod": 1018500.0,
        "pickUpName": "Brownsley Br Nyar Shop",
        "pickUpPhone": "+959788889337",
        "pickUpAddress": "Aunmyaythazan",
        "Shipper": { "name": "Brownsley Br Nyar Shop", "phone": "+959788889337" },
        "pickUpCity": {
            "id": 7,
            "name": "Mandalay",
            "state": { "id": 2, "name": "Mandalay Region" }
        },
        "destinationCity": {
            "id": 4,
            "name": "Yangon",
            "state": { "id": 1, "name": "Yangon Region" },
            "fee": 3500.0
        },
        "createdAt": "2025-08-08T04:30:00Z"
    })
}
