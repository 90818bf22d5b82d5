//! Selection set keyed by record identity.

use std::collections::BTreeSet;

use imei_model::{Record, RecordId, ValidationError};

/// Records the user has ticked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a record is selected.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    /// Flip membership of `id`. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &RecordId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Replace the selection with exactly the ids in `view`.
    pub fn select_all<'a, I>(&mut self, view: I)
    where
        I: IntoIterator<Item = &'a Record>,
    {
        self.ids = view.into_iter().map(|r| r.id.clone()).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that are not in `records`. Returns how many were dropped.
    pub fn prune(&mut self, records: &[Record]) -> usize {
        let live: BTreeSet<&RecordId> = records.iter().map(|r| &r.id).collect();
        let before = self.ids.len();
        self.ids.retain(|id| live.contains(id));
        before - self.ids.len()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordId> {
        self.ids.iter()
    }
}

impl FromIterator<RecordId> for Selection {
    fn from_iter<T: IntoIterator<Item = RecordId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Require every record of the full collection to be selected.
///
/// On failure the unselected records are reported by IMEI, in collection
/// order. An empty collection is trivially complete.
pub fn validate_full_selection(
    records: &[Record],
    selection: &Selection,
) -> Result<(), ValidationError> {
    let missing_imeis: Vec<String> = records
        .iter()
        .filter(|r| !selection.contains(&r.id))
        .map(|r| r.imei.clone())
        .collect();
    if missing_imeis.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::IncompleteSelection { missing_imeis })
    }
}
