//! Pickup session state machine.
//!
//! `AwaitingShipper → AwaitingDate → AwaitingFields → Locked`. Each
//! transition is gated by its own validation; a rejected input leaves the
//! stage unchanged. `Locked` is terminal: once the pickup context is
//! emitted, nothing about it may change for the rest of the session.

use chrono::{NaiveDate, Utc};

use crate::{
    directory::{LocationDirectory, LocationSelection},
    errors::ConsoleError,
    models::{PickupContext, Shipper},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupStage {
    AwaitingShipper,
    AwaitingDate,
    AwaitingFields,
    Locked,
}

#[derive(Debug, Clone, Default)]
pub struct PickupFields {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub selection: LocationSelection,
}

#[derive(Debug, Clone)]
pub struct PickupSession {
    stage: PickupStage,
    shipper: Option<Shipper>,
    pickup_date: Option<NaiveDate>,
    fields: PickupFields,
    context: Option<PickupContext>,
}

impl Default for PickupSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PickupSession {
    pub fn new() -> Self {
        Self {
            stage: PickupStage::AwaitingShipper,
            shipper: None,
            pickup_date: None,
            fields: PickupFields::default(),
            context: None,
        }
    }

    pub fn stage(&self) -> PickupStage {
        self.stage
    }

    pub fn shipper(&self) -> Option<&Shipper> {
        self.shipper.as_ref()
    }

    pub fn fields(&self) -> &PickupFields {
        &self.fields
    }

    /// The locked pickup context, once the session has reached `Locked`.
    pub fn context(&self) -> Option<&PickupContext> {
        self.context.as_ref()
    }

    /// Commits a resolved shipper to this session. Irreversible: pickup
    /// terms must not silently change mid-batch, so there is no way back to
    /// `AwaitingShipper` short of discarding the whole session.
    pub fn select_shipper(&mut self, shipper: Shipper) -> Result<(), ConsoleError> {
        self.expect_stage(PickupStage::AwaitingShipper, "select a shipper")?;
        // prefill the pickup contact from the shipper record
        self.fields.name = shipper.name.clone();
        self.fields.phone = shipper.phone.clone();
        self.shipper = Some(shipper);
        self.stage = PickupStage::AwaitingDate;
        Ok(())
    }

    /// Chooses the pickup date. The earliest acceptable date is tomorrow.
    pub fn choose_date(&mut self, date: NaiveDate) -> Result<(), ConsoleError> {
        self.choose_date_from(date, Utc::now().date_naive())
    }

    pub fn choose_date_from(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), ConsoleError> {
        self.expect_stage(PickupStage::AwaitingDate, "choose a pickup date")?;
        if date <= today {
            return Err(ConsoleError::Validation(
                "Pickup date must be tomorrow or later.".to_string(),
            ));
        }
        self.pickup_date = Some(date);
        self.stage = PickupStage::AwaitingFields;
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ConsoleError> {
        self.expect_stage(PickupStage::AwaitingFields, "edit pickup fields")?;
        self.fields.name = name.into();
        Ok(())
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) -> Result<(), ConsoleError> {
        self.expect_stage(PickupStage::AwaitingFields, "edit pickup fields")?;
        self.fields.phone = phone.into();
        Ok(())
    }

    pub fn set_address(&mut self, address: impl Into<String>) -> Result<(), ConsoleError> {
        self.expect_stage(PickupStage::AwaitingFields, "edit pickup fields")?;
        self.fields.address = address.into();
        Ok(())
    }

    pub fn select_state(
        &mut self,
        directory: &LocationDirectory,
        state_id: Option<i64>,
    ) -> Result<(), ConsoleError> {
        self.expect_stage(PickupStage::AwaitingFields, "edit pickup fields")?;
        self.fields.selection.select_state(directory, state_id);
        Ok(())
    }

    pub fn select_city(
        &mut self,
        directory: &LocationDirectory,
        city_id: i64,
    ) -> Result<(), ConsoleError> {
        self.expect_stage(PickupStage::AwaitingFields, "edit pickup fields")?;
        self.fields.selection.select_city(directory, city_id)
    }

    /// Locks the session and emits the pickup context.
    ///
    /// Requires name, phone, state, and city. After this call every input
    /// on the session is rejected.
    pub fn create_order(&mut self) -> Result<&PickupContext, ConsoleError> {
        self.expect_stage(PickupStage::AwaitingFields, "create the order")?;

        if self.fields.name.trim().is_empty() || self.fields.phone.trim().is_empty() {
            return Err(ConsoleError::Validation(
                "Pickup name and phone are required.".to_string(),
            ));
        }
        if self.fields.selection.state_id().is_none() {
            return Err(ConsoleError::Validation(
                "Pickup state is required.".to_string(),
            ));
        }
        let city_id = self.fields.selection.city_id().ok_or_else(|| {
            ConsoleError::Validation("Pickup city is required.".to_string())
        })?;

        let shipper = self
            .shipper
            .as_ref()
            .ok_or_else(|| ConsoleError::Internal("Pickup session lost its shipper".to_string()))?;

        self.context = Some(PickupContext {
            shipper_id: shipper.id.clone(),
            pickup_date: self.pickup_date,
            pickup_name: self.fields.name.trim().to_string(),
            pickup_phone: self.fields.phone.trim().to_string(),
            pickup_address: self.fields.address.trim().to_string(),
            pickup_city_id: Some(city_id),
        });
        self.stage = PickupStage::Locked;
        Ok(self.context.as_ref().expect("context just set"))
    }

    /// Discards everything and starts over. Only used after a successful
    /// submission clears the session; there is no partial unlock.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn expect_stage(&self, stage: PickupStage, action: &str) -> Result<(), ConsoleError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(ConsoleError::InvalidOperation(format!(
                "Cannot {} at this step.",
                action
            )))
        }
    }
}
