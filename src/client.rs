//! Typed client for the remote order/shipper/city service.
//!
//! Stateless beyond the shared HTTP connection pool: every call maps the
//! transport and envelope outcome onto the console error taxonomy and
//! returns plain domain types. No retries; callers decide what to do.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    config::AppConfig,
    errors::ConsoleError,
    models::{
        City, Envelope, NewMeasurement, OrderUpdate, ParcelMeasurement, PersistedOrder, Shipper,
        State, SubmissionPayload,
    },
    session::TokenStore,
};

#[derive(Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl ServiceClient {
    pub fn new(config: &AppConfig, tokens: TokenStore) -> Result<Self, ConsoleError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ConsoleError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(format!("{}{}", self.base_url, path)))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// `GET /order/state/get`
    #[instrument(skip(self))]
    pub async fn list_states(&self) -> Result<Vec<State>, ConsoleError> {
        let response = self.get("/order/state/get").send().await?;
        unwrap_envelope(response, "state directory").await
    }

    /// `GET /order/city/get`
    #[instrument(skip(self))]
    pub async fn list_cities(&self) -> Result<Vec<City>, ConsoleError> {
        let response = self.get("/order/city/get").send().await?;
        unwrap_envelope(response, "city directory").await
    }

    /// `GET /shipper/{id}`
    #[instrument(skip(self), fields(shipper_id = %shipper_id))]
    pub async fn get_shipper(&self, shipper_id: &str) -> Result<Shipper, ConsoleError> {
        let response = self
            .get(&format!("/shipper/{}", shipper_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ConsoleError::NotFound(format!(
                "Shipper with ID {} not found.",
                shipper_id
            )));
        }
        unwrap_envelope(response, "shipper").await
    }

    /// `POST /order/upload`: submits a whole batch at once.
    ///
    /// Returns the raw created-order body; the caller only needs success
    /// or the server's failure message.
    #[instrument(skip(self, payload), fields(shipper_id = %payload.shipper_id, order_count = payload.orders.len()))]
    pub async fn upload_orders(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<serde_json::Value, ConsoleError> {
        let response = self
            .authorize(self.http.post(format!("{}/order/upload", self.base_url)))
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(service_error(response, "Order submission failed.").await);
        }
        debug!(status = %status, "order batch accepted");
        Ok(response.json().await.unwrap_or(serde_json::Value::Null))
    }

    /// `GET /order`: the bounded recent-orders list.
    #[instrument(skip(self))]
    pub async fn recent_orders(&self) -> Result<Vec<PersistedOrder>, ConsoleError> {
        let response = self.get("/order").send().await?;
        unwrap_envelope(response, "orders").await
    }

    /// `GET /order/search?{filters}`
    #[instrument(skip(self, params))]
    pub async fn search_orders(
        &self,
        params: &[(String, String)],
    ) -> Result<Vec<PersistedOrder>, ConsoleError> {
        let response = self.get("/order/search").query(params).send().await?;
        unwrap_envelope(response, "orders").await
    }

    /// `GET /order/{trackingId}`
    #[instrument(skip(self), fields(tracking_id = %tracking_id))]
    pub async fn get_order(&self, tracking_id: &str) -> Result<PersistedOrder, ConsoleError> {
        let response = self.get(&format!("/order/{}", tracking_id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ConsoleError::NotFound(format!(
                "Order {} not found.",
                tracking_id
            )));
        }
        unwrap_envelope(response, "order").await
    }

    /// `PUT /order/OrderUpdate/{trackingId}`
    #[instrument(skip(self, update), fields(tracking_id = %tracking_id))]
    pub async fn update_order(
        &self,
        tracking_id: &str,
        update: &OrderUpdate,
    ) -> Result<(), ConsoleError> {
        let response = self
            .authorize(
                self.http
                    .put(format!("{}/order/OrderUpdate/{}", self.base_url, tracking_id)),
            )
            .json(update)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(service_error(response, "Failed to update order.").await);
        }
        Ok(())
    }

    /// `GET /oswm/{trackingId}`: parcel measurement for one order.
    #[instrument(skip(self), fields(tracking_id = %tracking_id))]
    pub async fn get_measurement(
        &self,
        tracking_id: &str,
    ) -> Result<ParcelMeasurement, ConsoleError> {
        let response = self.get(&format!("/oswm/{}", tracking_id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ConsoleError::NotFound(format!(
                "No measurement recorded for {}.",
                tracking_id
            )));
        }
        unwrap_envelope(response, "measurement").await
    }

    /// `POST /oswm`
    #[instrument(skip(self, measurement), fields(tracking_id = %measurement.tracking_id))]
    pub async fn create_measurement(
        &self,
        measurement: &NewMeasurement,
    ) -> Result<(), ConsoleError> {
        let response = self
            .authorize(self.http.post(format!("{}/oswm", self.base_url)))
            .json(measurement)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(service_error(response, "Failed to record measurement.").await);
        }
        Ok(())
    }
}

/// Decodes a `{ success, data, message }` body into its payload.
///
/// Non-2xx statuses and `success: false` both surface the server's message
/// when one is present.
async fn unwrap_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, ConsoleError> {
    let status = response.status();
    if !status.is_success() {
        return Err(service_error(response, &format!("Failed to fetch {}.", what)).await);
    }

    let envelope: Envelope<T> = response.json().await?;
    if !envelope.success {
        return Err(ConsoleError::Service(envelope.message.unwrap_or_else(
            || format!("Failed to fetch {}.", what),
        )));
    }
    envelope
        .data
        .ok_or_else(|| ConsoleError::Internal(format!("Service returned no {} data", what)))
}

/// Pulls the server-provided message out of an error response, falling back
/// to a generic one.
async fn service_error(response: reqwest::Response, fallback: &str) -> ConsoleError {
    let status = response.status();
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| format!("{} (HTTP {})", fallback, status.as_u16()));
    ConsoleError::Service(message)
}
