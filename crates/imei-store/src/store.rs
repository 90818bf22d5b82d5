use imei_model::{DeleteAck, NewRecord, Record, RecordId, RecordPatch};

use crate::error::Result;

/// Remote collection of inventory records.
///
/// Mutations return once the backend has acknowledged them; they do not
/// return the refreshed collection.
pub trait RecordStore {
    /// Fetch the full collection in backend order.
    fn list(&self) -> Result<Vec<Record>>;

    fn create(&self, record: &NewRecord) -> Result<()>;

    fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()>;

    /// Delete (or archive, at the backend's discretion) one record.
    fn delete(&self, id: &RecordId) -> Result<DeleteAck>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn list(&self) -> Result<Vec<Record>> {
        (**self).list()
    }

    fn create(&self, record: &NewRecord) -> Result<()> {
        (**self).create(record)
    }

    fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &RecordId) -> Result<DeleteAck> {
        (**self).delete(id)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn list(&self) -> Result<Vec<Record>> {
        (**self).list()
    }

    fn create(&self, record: &NewRecord) -> Result<()> {
        (**self).create(record)
    }

    fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &RecordId) -> Result<DeleteAck> {
        (**self).delete(id)
    }
}
