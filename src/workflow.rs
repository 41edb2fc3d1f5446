//! Order-entry orchestration.
//!
//! Composes the pickup session, the batch builder, and the submission
//! formatter around the upload call. On success the batch and pickup
//! session are cleared; on failure every piece of local state survives so
//! the operator can retry without re-entering anything.

use tracing::{error, info, instrument};

use crate::{
    batch::OrderBatchBuilder,
    client::ServiceClient,
    directory::{LocationDirectory, LocationSelection},
    errors::ConsoleError,
    formatter::format_submission,
    models::{OrderUpdate, PersistedOrder},
    pickup::PickupSession,
};

pub struct OrderEntryWorkflow {
    client: ServiceClient,
    pub pickup: PickupSession,
    pub batch: OrderBatchBuilder,
}

impl OrderEntryWorkflow {
    pub fn new(client: ServiceClient) -> Self {
        Self {
            client,
            pickup: PickupSession::new(),
            batch: OrderBatchBuilder::new(),
        }
    }

    /// Formats and uploads the current batch.
    ///
    /// The formatter gate runs before any network traffic; a validation
    /// failure or a server rejection leaves the pickup session and batch
    /// untouched for retry.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<serde_json::Value, ConsoleError> {
        let context = self.pickup.context().ok_or_else(|| {
            ConsoleError::InvalidOperation(
                "Confirm the pickup details before submitting orders.".to_string(),
            )
        })?;

        let payload = format_submission(context, self.batch.batch())?;
        let order_count = payload.orders.len();

        match self.client.upload_orders(&payload).await {
            Ok(created) => {
                info!(order_count, shipper_id = %payload.shipper_id, "order batch submitted");
                self.batch.clear();
                self.pickup.reset();
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, order_count, "order submission failed; state preserved for retry");
                Err(e)
            }
        }
    }
}

/// Edit flow for one persisted order.
///
/// Pickup facts are read-only pass-through; only the customer and
/// destination fields are editable, with the same cascade and required-field
/// rules as order entry.
pub struct OrderEditor {
    client: ServiceClient,
    directory: LocationDirectory,
    tracking_id: String,
    update: OrderUpdate,
    selection: LocationSelection,
}

impl OrderEditor {
    /// Loads the order and the location directory, seeding the editable
    /// fields. A destination city that does not belong to the loaded
    /// state's city set starts out cleared.
    #[instrument(skip(client), fields(tracking_id = %tracking_id))]
    pub async fn load(client: ServiceClient, tracking_id: &str) -> Result<Self, ConsoleError> {
        let directory = LocationDirectory::load(&client).await;
        let order = client.get_order(tracking_id).await?;

        let state_id = order
            .destination_city
            .as_ref()
            .and_then(|c| c.state.as_ref())
            .map(|s| s.id);
        let city_id = order.destination_city.as_ref().map(|c| c.id);

        let selection = match state_id {
            Some(state_id) => {
                let city_id =
                    city_id.filter(|city| directory.contains_city(state_id, *city));
                LocationSelection::restored(state_id, city_id)
            }
            None => LocationSelection::new(),
        };

        Ok(Self {
            client,
            directory,
            tracking_id: tracking_id.to_string(),
            update: seed_update(&order),
            selection,
        })
    }

    pub fn directory(&self) -> &LocationDirectory {
        &self.directory
    }

    pub fn update(&self) -> &OrderUpdate {
        &self.update
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.update.cus_name = name.into();
    }

    pub fn set_customer_phone(&mut self, phone: impl Into<String>) {
        self.update.cus_phone = phone.into();
    }

    pub fn set_customer_address(&mut self, address: impl Into<String>) {
        self.update.cus_address = address.into();
    }

    pub fn set_cod(&mut self, cod: rust_decimal::Decimal) {
        self.update.cod = cod;
    }

    pub fn set_delivery(&mut self, delivery: bool) {
        self.update.delivery = delivery;
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.update.note = note.into();
    }

    pub fn select_state(&mut self, state_id: Option<i64>) {
        self.selection.select_state(&self.directory, state_id);
        self.update.city_id = self.selection.city_id();
    }

    pub fn select_city(&mut self, city_id: i64) -> Result<(), ConsoleError> {
        self.selection.select_city(&self.directory, city_id)?;
        self.update.city_id = self.selection.city_id();
        Ok(())
    }

    /// Revalidates and PUTs the update.
    #[instrument(skip(self), fields(tracking_id = %self.tracking_id))]
    pub async fn submit(&self) -> Result<(), ConsoleError> {
        if self.update.cus_name.trim().is_empty()
            || self.update.cus_phone.trim().is_empty()
            || self.update.city_id.is_none()
        {
            return Err(ConsoleError::Validation(
                "Customer Name, Phone, and City are required.".to_string(),
            ));
        }
        if self.update.cod < rust_decimal::Decimal::ZERO {
            return Err(ConsoleError::Validation(
                "COD cannot be negative.".to_string(),
            ));
        }
        self.client
            .update_order(&self.tracking_id, &self.update)
            .await?;
        info!(tracking_id = %self.tracking_id, "order updated");
        Ok(())
    }
}

fn seed_update(order: &PersistedOrder) -> OrderUpdate {
    OrderUpdate {
        cus_name: order.cus_name.clone(),
        cus_phone: order.cus_phone.clone(),
        cus_address: order.cus_address.clone(),
        pick_up_address: order.pick_up_address.clone().unwrap_or_default(),
        pick_up_phone: order.pick_up_phone.clone().unwrap_or_default(),
        pick_up_name: order.pick_up_name.clone().unwrap_or_default(),
        pick_up_date: order.pick_up_date,
        pick_up_city_id: order.pick_up_city_id,
        cod: order.cod.unwrap_or_default(),
        delivery: order.delivery.unwrap_or(true),
        note: order.note.clone().unwrap_or_default(),
        city_id: order.destination_city.as_ref().map(|c| c.id),
    }
}
