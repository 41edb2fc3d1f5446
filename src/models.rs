//! Wire and domain types shared across the console.
//!
//! Serde renames preserve the order service's exact JSON field names,
//! including the historical capitalized `Shipper` and `Images` keys.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Standard response envelope used by most service endpoints.
///
/// A handful of read endpoints omit `success`; absence means success.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct State {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: i64,
    pub name: String,
    pub state_id: i64,
    /// Base delivery fee for this destination.
    #[serde(default)]
    pub fee: Option<Decimal>,
}

/// Shipper record as returned by the shipper lookup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipper {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub state_name: String,
}

/// One destination order being composed client-side.
///
/// `state_id` exists only for the cascading city selection and never
/// reaches the wire; the submission payload carries `city_id` alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrder {
    pub cus_name: String,
    pub cus_phone: String,
    pub cus_address: String,
    pub cod: Decimal,
    pub delivery: bool,
    pub note: String,
    #[serde(skip)]
    pub state_id: Option<i64>,
    pub city_id: Option<i64>,
}

impl Default for DraftOrder {
    fn default() -> Self {
        Self {
            cus_name: String::new(),
            cus_phone: String::new(),
            cus_address: String::new(),
            cod: Decimal::ZERO,
            delivery: true,
            note: String::new(),
            state_id: None,
            city_id: None,
        }
    }
}

/// The locked set of shipper/date/address facts covering a whole batch.
///
/// Emitted once by the pickup session and read-only from then on.
#[derive(Debug, Clone, PartialEq)]
pub struct PickupContext {
    pub shipper_id: String,
    pub pickup_date: Option<NaiveDate>,
    pub pickup_name: String,
    pub pickup_phone: String,
    pub pickup_address: String,
    pub pickup_city_id: Option<i64>,
}

/// Order as it rides inside the submission payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedOrder {
    pub cus_name: String,
    pub cus_phone: String,
    pub cus_address: String,
    pub cod: Decimal,
    pub delivery: bool,
    pub note: String,
    pub city_id: i64,
}

/// Body of `POST /order/upload`. Constructed once per submit, immutable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub shipper_id: String,
    pub pick_up_address: String,
    pub pick_up_date: String,
    pub pick_up_phone: String,
    pub pick_up_name: String,
    pub pick_up_city_id: i64,
    pub orders: Vec<SubmittedOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub state: Option<StateRef>,
    #[serde(default)]
    pub fee: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipperRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Order as persisted by the service. Owned and mutated server-side only;
/// the console treats it as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedOrder {
    pub id: i64,
    pub tracking_id: String,
    pub cus_name: String,
    pub cus_phone: String,
    #[serde(default)]
    pub cus_address: String,
    #[serde(default)]
    pub cod: Option<Decimal>,
    #[serde(default)]
    pub total_cod: Option<Decimal>,
    /// Override delivery fee, set server-side after weighing.
    #[serde(default)]
    pub deli_fee: Option<Decimal>,
    #[serde(default)]
    pub delivery: Option<bool>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub pick_up_name: Option<String>,
    #[serde(default)]
    pub pick_up_phone: Option<String>,
    #[serde(default)]
    pub pick_up_address: Option<String>,
    #[serde(default)]
    pub pick_up_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pick_up_city_id: Option<i64>,
    #[serde(default, rename = "Shipper")]
    pub shipper: Option<ShipperRef>,
    #[serde(default)]
    pub pick_up_city: Option<CityRef>,
    #[serde(default)]
    pub destination_city: Option<CityRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Parcel weight/size record, keyed by tracking id.
///
/// Fetched independently of the order; a missing or partial record
/// degrades to placeholders at render time, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelMeasurement {
    #[serde(default)]
    pub kg: Option<f64>,
    #[serde(default)]
    pub cm: Option<f64>,
    #[serde(default, rename = "Images")]
    pub images: Vec<String>,
}

/// Body of `POST /oswm`.
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMeasurement {
    pub tracking_id: String,
    #[validate(range(min = 0.001, message = "Weight must be positive"))]
    pub kg: f64,
    #[validate(range(min = 0.001, message = "Size must be positive"))]
    pub cm: f64,
    #[serde(rename = "OrderId")]
    pub order_id: i64,
    #[serde(rename = "Images")]
    pub images: Vec<String>,
}

/// Body of `PUT /order/OrderUpdate/{trackingId}`.
///
/// Pickup fields are passed through unchanged from the loaded order; only
/// the customer/destination fields are editable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub cus_name: String,
    pub cus_phone: String,
    pub cus_address: String,
    pub pick_up_address: String,
    pub pick_up_phone: String,
    pub pick_up_name: String,
    pub pick_up_date: Option<DateTime<Utc>>,
    pub pick_up_city_id: Option<i64>,
    pub cod: Decimal,
    pub delivery: bool,
    pub note: String,
    pub city_id: Option<i64>,
}
