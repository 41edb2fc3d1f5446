//! Shipper lookup.
//!
//! Resolution fetches candidate data; committing the candidate to a pickup
//! session is a separate, explicit step owned by [`crate::pickup`].

use tracing::{info, instrument};

use crate::{client::ServiceClient, errors::ConsoleError, models::Shipper};

#[derive(Clone)]
pub struct ShipperResolver {
    client: ServiceClient,
}

impl ShipperResolver {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Looks up a shipper by external identifier.
    ///
    /// No side effects beyond the read; on not-found the caller may retry
    /// with a corrected id.
    #[instrument(skip(self), fields(shipper_id = %shipper_id))]
    pub async fn resolve(&self, shipper_id: &str) -> Result<Shipper, ConsoleError> {
        let shipper_id = shipper_id.trim();
        if shipper_id.is_empty() {
            return Err(ConsoleError::Validation(
                "Please enter a Shipper ID.".to_string(),
            ));
        }

        let mut shipper = self.client.get_shipper(shipper_id).await?;
        if shipper.id.is_empty() {
            // older service builds omit the id in the lookup body
            shipper.id = shipper_id.to_string();
        }
        info!(shipper_id = %shipper.id, name = %shipper.name, "shipper resolved");
        Ok(shipper)
    }
}
