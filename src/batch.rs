//! Working set of destination orders for one submission.
//!
//! Two ingestion modes feed the same output batch: manual entry through an
//! editable, paginated list, and bulk load from an imported spreadsheet.
//! The modes are mutually exclusive entry paths, so switching between them
//! drops the other mode's un-submitted data.

use crate::{
    directory::{LocationDirectory, LocationSelection},
    errors::ConsoleError,
    models::DraftOrder,
};
use rust_decimal::Decimal;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Manual,
    File,
}

#[derive(Debug, Clone)]
pub struct OrderBatchBuilder {
    mode: EntryMode,
    manual_orders: Vec<DraftOrder>,
    file_orders: Vec<DraftOrder>,
    draft: DraftOrder,
    selection: LocationSelection,
    editing: Option<usize>,
}

impl Default for OrderBatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBatchBuilder {
    pub fn new() -> Self {
        Self {
            mode: EntryMode::Manual,
            manual_orders: Vec::new(),
            file_orders: Vec::new(),
            draft: DraftOrder::default(),
            selection: LocationSelection::new(),
            editing: None,
        }
    }

    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    /// Switches ingestion mode, discarding the other mode's in-progress
    /// data. Destructive on purpose: one submission comes from exactly one
    /// entry path.
    pub fn set_mode(&mut self, mode: EntryMode) {
        if self.mode == mode {
            return;
        }
        match mode {
            EntryMode::Manual => self.file_orders.clear(),
            EntryMode::File => {
                self.manual_orders.clear();
                self.reset_draft();
            }
        }
        self.mode = mode;
    }

    /// The finalized batch for the active mode.
    pub fn batch(&self) -> &[DraftOrder] {
        match self.mode {
            EntryMode::Manual => &self.manual_orders,
            EntryMode::File => &self.file_orders,
        }
    }

    pub fn len(&self) -> usize {
        self.batch().len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch().is_empty()
    }

    /// Clears everything after a successful submission.
    pub fn clear(&mut self) {
        self.manual_orders.clear();
        self.file_orders.clear();
        self.reset_draft();
    }

    // ---- manual mode -------------------------------------------------

    pub fn draft(&self) -> &DraftOrder {
        &self.draft
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.editing
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.draft.cus_name = name.into();
    }

    pub fn set_customer_phone(&mut self, phone: impl Into<String>) {
        self.draft.cus_phone = phone.into();
    }

    pub fn set_customer_address(&mut self, address: impl Into<String>) {
        self.draft.cus_address = address.into();
    }

    pub fn set_cod(&mut self, cod: Decimal) {
        self.draft.cod = cod;
    }

    pub fn set_delivery(&mut self, delivery: bool) {
        self.draft.delivery = delivery;
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.draft.note = note.into();
    }

    pub fn select_state(&mut self, directory: &LocationDirectory, state_id: Option<i64>) {
        self.selection.select_state(directory, state_id);
        self.draft.state_id = self.selection.state_id();
        self.draft.city_id = self.selection.city_id();
    }

    pub fn select_city(
        &mut self,
        directory: &LocationDirectory,
        city_id: i64,
    ) -> Result<(), ConsoleError> {
        self.selection.select_city(directory, city_id)?;
        self.draft.city_id = self.selection.city_id();
        Ok(())
    }

    /// Saves the active draft: replaces the record under edit, or appends.
    ///
    /// Customer name, phone, and city are all required; a violation blocks
    /// the save whole, leaving both the draft and the list untouched.
    pub fn save(&mut self) -> Result<(), ConsoleError> {
        if self.draft.cus_name.trim().is_empty()
            || self.draft.cus_phone.trim().is_empty()
            || self.draft.city_id.is_none()
        {
            return Err(ConsoleError::Validation(
                "Please fill required fields: Customer Name, Phone, and City.".to_string(),
            ));
        }
        if self.draft.cod < Decimal::ZERO {
            return Err(ConsoleError::Validation(
                "COD cannot be negative.".to_string(),
            ));
        }

        let record = self.draft.clone();
        match self.editing.take() {
            Some(index) => self.manual_orders[index] = record,
            None => self.manual_orders.push(record),
        }
        self.reset_draft();
        Ok(())
    }

    /// Loads the record at `index` (absolute, not page-relative) into the
    /// draft form. Only one record is editable at a time.
    pub fn edit(&mut self, index: usize) -> Result<(), ConsoleError> {
        let record = self.manual_orders.get(index).ok_or_else(|| {
            ConsoleError::InvalidOperation(format!("No order at index {}.", index))
        })?;
        self.draft = record.clone();
        self.selection = match self.draft.state_id {
            Some(state_id) => LocationSelection::restored(state_id, self.draft.city_id),
            None => LocationSelection::new(),
        };
        self.editing = Some(index);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.reset_draft();
    }

    /// Removes the record at `index`. Deleting the record under edit also
    /// cancels the edit; deleting an earlier record shifts the edit index.
    pub fn delete(&mut self, index: usize) -> Result<DraftOrder, ConsoleError> {
        if index >= self.manual_orders.len() {
            return Err(ConsoleError::InvalidOperation(format!(
                "No order at index {}.",
                index
            )));
        }
        let removed = self.manual_orders.remove(index);
        match self.editing {
            Some(editing) if editing == index => self.cancel_edit(),
            Some(editing) if editing > index => self.editing = Some(editing - 1),
            _ => {}
        }
        Ok(removed)
    }

    // ---- file mode ---------------------------------------------------

    /// Replaces the file-mode batch with freshly imported rows.
    pub fn load_file_orders(&mut self, orders: Vec<DraftOrder>) {
        self.file_orders = orders;
    }

    /// Drops the imported batch, e.g. after a failed parse or when the
    /// operator removes the file.
    pub fn clear_file_orders(&mut self) {
        self.file_orders.clear();
    }

    // ---- pagination --------------------------------------------------

    pub fn total_pages(&self) -> usize {
        self.batch().len().div_ceil(PAGE_SIZE)
    }

    /// One display page (1-based). Records keep their absolute indices;
    /// edit and delete always address the full list.
    pub fn page(&self, page: usize) -> &[DraftOrder] {
        let batch = self.batch();
        let start = page.saturating_sub(1) * PAGE_SIZE;
        if start >= batch.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(batch.len());
        &batch[start..end]
    }

    fn reset_draft(&mut self) {
        self.draft = DraftOrder::default();
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, State};
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn directory() -> LocationDirectory {
        LocationDirectory::from_parts(
            vec![State { id: 1, name: "California".to_string() }],
            vec![
                City { id: 2, name: "Los Angeles".to_string(), state_id: 1, fee: None },
                City { id: 3, name: "San Francisco".to_string(), state_id: 1, fee: None },
            ],
        )
    }

    fn builder_with(count: usize) -> OrderBatchBuilder {
        let dir = directory();
        let mut builder = OrderBatchBuilder::new();
        for i in 0..count {
            builder.set_customer_name(format!("Customer {}", i));
            builder.set_customer_phone(format!("0912345{:02}", i));
            builder.select_state(&dir, Some(1));
            builder.select_city(&dir, 2).unwrap();
            builder.save().unwrap();
        }
        builder
    }

    #[test]
    fn save_without_phone_is_rejected_and_batch_unchanged() {
        let dir = directory();
        let mut builder = OrderBatchBuilder::new();
        builder.set_customer_name("Jane");
        builder.select_state(&dir, Some(1));
        builder.select_city(&dir, 2).unwrap();

        let err = builder.save().unwrap_err();
        assert_matches!(err, ConsoleError::Validation(_));
        assert_eq!(builder.len(), 0);
        // the rejected draft is preserved for correction
        assert_eq!(builder.draft().cus_name, "Jane");
    }

    #[test]
    fn negative_cod_blocks_the_save() {
        let dir = directory();
        let mut builder = OrderBatchBuilder::new();
        builder.set_customer_name("Jane");
        builder.set_customer_phone("09123456");
        builder.select_state(&dir, Some(1));
        builder.select_city(&dir, 2).unwrap();
        builder.set_cod(dec!(-1));
        assert_matches!(builder.save(), Err(ConsoleError::Validation(_)));
        assert_eq!(builder.len(), 0);
    }

    #[test]
    fn save_appends_and_resets_the_draft() {
        let builder = builder_with(1);
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.draft().cus_name, "");
        assert_eq!(builder.draft().cod, Decimal::ZERO);
        assert!(builder.draft().delivery);
    }

    #[test]
    fn editing_an_absolute_index_updates_the_right_record() {
        // record 12 lives on page 2 with page size 10
        let mut builder = builder_with(15);
        builder.edit(12).unwrap();
        builder.set_customer_name("Edited");
        builder.set_cod(dec!(750));
        builder.save().unwrap();

        assert_eq!(builder.len(), 15);
        assert_eq!(builder.batch()[12].cus_name, "Edited");
        assert_eq!(builder.batch()[12].cod, dec!(750));
        assert_eq!(builder.batch()[11].cus_name, "Customer 11");
        assert_eq!(builder.batch()[13].cus_name, "Customer 13");
    }

    #[test]
    fn page_two_holds_records_ten_to_nineteen() {
        let builder = builder_with(15);
        assert_eq!(builder.total_pages(), 2);
        let page = builder.page(2);
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].cus_name, "Customer 10");
    }

    #[test]
    fn deleting_the_record_under_edit_cancels_the_edit() {
        let mut builder = builder_with(3);
        builder.edit(1).unwrap();
        builder.delete(1).unwrap();
        assert_eq!(builder.editing_index(), None);
        assert_eq!(builder.draft().cus_name, "");
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn deleting_before_the_edited_record_shifts_the_edit_index() {
        let mut builder = builder_with(3);
        builder.edit(2).unwrap();
        builder.delete(0).unwrap();
        assert_eq!(builder.editing_index(), Some(1));
        builder.set_customer_name("Still the right one");
        builder.save().unwrap();
        assert_eq!(builder.batch()[1].cus_name, "Still the right one");
    }

    #[test]
    fn cancel_edit_restores_the_empty_draft() {
        let mut builder = builder_with(2);
        builder.edit(0).unwrap();
        builder.set_customer_name("half-typed");
        builder.cancel_edit();
        assert_eq!(builder.draft().cus_name, "");
        assert_eq!(builder.batch()[0].cus_name, "Customer 0");
    }

    #[test]
    fn switching_modes_discards_the_other_modes_data() {
        let mut builder = builder_with(2);
        builder.set_mode(EntryMode::File);
        builder.load_file_orders(vec![DraftOrder {
            cus_name: "Imported".to_string(),
            cus_phone: "09000".to_string(),
            city_id: Some(2),
            ..DraftOrder::default()
        }]);
        assert_eq!(builder.len(), 1);

        builder.set_mode(EntryMode::Manual);
        assert!(builder.is_empty());

        builder.set_mode(EntryMode::File);
        assert!(builder.is_empty());
    }
}
