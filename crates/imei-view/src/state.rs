//! Inventory view state - the full collection plus ephemeral UI state.
//!
//! # Design
//!
//! All mutation goes through named transitions (`load`, `set_filter`,
//! `set_search`, `toggle_select`, `select_all`, `clear_selection`,
//! `start_edit`, `commit_edit`, `cancel_edit`). The invariants hold after
//! every transition:
//!
//! - the selection only contains ids of the current full collection;
//! - an edit draft always refers to a record of the current collection;
//! - the visible view is the full collection with the status filter AND the
//!   suffix search applied.

use imei_model::{Estado, Record, RecordId, RecordPatch, StateFilter, ValidationError};
use tracing::{debug, warn};

use crate::projection::ViewFilter;
use crate::selection::{Selection, validate_full_selection};

/// Where the collection stands relative to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A list request is in flight.
    Loading,
    /// The collection reflects the latest successful list.
    Ready,
    /// The last list request failed; the previous collection is kept.
    Failed {
        /// Message shown to the user.
        message: String,
    },
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Snapshot of a record being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: RecordId,
    pub imei: String,
    pub estado: Estado,
}

impl EditDraft {
    fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            imei: record.imei.clone(),
            estado: record.estado,
        }
    }
}

/// Collection and view state owned by one controller.
#[derive(Debug, Clone, Default)]
pub struct InventoryState {
    records: Vec<Record>,
    filter: ViewFilter,
    selection: Selection,
    editing: Option<EditDraft>,
    status: LoadStatus,
    notice: Option<String>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Full collection in backend order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Last user-facing message (failures and confirmations).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Records passing the current filter, in collection order.
    pub fn visible(&self) -> Vec<&Record> {
        self.filter.apply(&self.records)
    }

    /// Number of selected records.
    pub fn selection_count(&self) -> usize {
        self.selection.len()
    }

    /// Number of sold records in the full collection.
    pub fn sold_count(&self) -> usize {
        self.records.iter().filter(|r| r.estado.is_sold()).count()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Replace the collection wholesale and reconcile dependent state.
    pub fn load(&mut self, records: Vec<Record>) {
        self.records = records;
        let pruned = self.selection.prune(&self.records);
        if pruned > 0 {
            debug!(pruned, "dropped stale ids from selection");
        }
        if let Some(draft) = &self.editing
            && self.record(&draft.id).is_none()
        {
            warn!(id = %draft.id, "record being edited disappeared; discarding draft");
            self.editing = None;
        }
        self.status = LoadStatus::Ready;
    }

    pub fn set_filter(&mut self, state: StateFilter) {
        self.filter.state = state;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    /// Flip selection of one record. Unknown ids are rejected.
    pub fn toggle_select(&mut self, id: &RecordId) -> Result<bool, ValidationError> {
        if self.record(id).is_none() {
            warn!(%id, "ignoring toggle for unknown record");
            return Err(ValidationError::UnknownRecord(id.clone()));
        }
        Ok(self.selection.toggle(id))
    }

    /// Select exactly the currently visible records.
    pub fn select_all(&mut self) {
        let visible = self.filter.apply(&self.records);
        self.selection.select_all(visible);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Begin editing a record, replacing any previous draft.
    pub fn start_edit(&mut self, id: &RecordId) -> Result<(), ValidationError> {
        let record = self
            .record(id)
            .ok_or_else(|| ValidationError::UnknownRecord(id.clone()))?;
        self.editing = Some(EditDraft::from_record(record));
        Ok(())
    }

    /// Change the fields of the active draft.
    pub fn update_draft(
        &mut self,
        imei: Option<&str>,
        estado: Option<Estado>,
    ) -> Result<(), ValidationError> {
        let draft = self.editing.as_mut().ok_or(ValidationError::NothingToEdit)?;
        if let Some(imei) = imei {
            draft.imei = imei.to_string();
        }
        if let Some(estado) = estado {
            draft.estado = estado;
        }
        Ok(())
    }

    /// Validate the draft and produce the update request body.
    ///
    /// The draft stays in place until the backend acknowledges the update
    /// (see [`InventoryState::finish_edit`]), so a failed save can be retried.
    pub fn commit_edit(&self) -> Result<(RecordId, RecordPatch), ValidationError> {
        let draft = self.editing.as_ref().ok_or(ValidationError::NothingToEdit)?;
        if self.record(&draft.id).is_none() {
            return Err(ValidationError::UnknownRecord(draft.id.clone()));
        }
        let patch = RecordPatch::new(&draft.imei, draft.estado)?;
        Ok((draft.id.clone(), patch))
    }

    /// Drop the draft after a successful update of `id`.
    pub fn finish_edit(&mut self, id: &RecordId) {
        if self.editing.as_ref().is_some_and(|d| &d.id == id) {
            self.editing = None;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Full collection, provided every record is selected.
    pub fn records_for_export(&self) -> Result<&[Record], ValidationError> {
        validate_full_selection(&self.records, &self.selection)?;
        Ok(&self.records)
    }

    // =========================================================================
    // Request bookkeeping (driven by the controller)
    // =========================================================================

    pub(crate) fn mark_loading(&mut self) {
        self.status = LoadStatus::Loading;
    }

    pub(crate) fn mark_load_failed(&mut self, message: impl Into<String>) {
        self.status = LoadStatus::Failed {
            message: message.into(),
        };
    }

    pub(crate) fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
