//! In-process record store.
//!
//! Behaves like the REST backend (sequential ids, server-side timestamps,
//! 404 for unknown ids) without a network. Used for offline runs and tests.

use std::sync::Mutex;

use chrono::Utc;
use tracing::debug;

use imei_model::{DeleteAck, NewRecord, Record, RecordId, RecordPatch};

use crate::error::{Result, StoreError};
use crate::store::RecordStore;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<Record>,
    next_id: u64,
    fail_next: Option<StoreError>,
}

/// Record store held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_records(records: Vec<Record>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|r| r.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            inner: Mutex::new(Inner {
                records,
                next_id,
                fail_next: None,
            }),
        }
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: StoreError) {
        self.lock().fail_next = Some(error);
    }

    /// Current contents, in insertion order.
    pub fn snapshot(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves plain data behind; keep using it.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn not_found(id: &RecordId) -> StoreError {
        StoreError::Status {
            status: 404,
            message: format!("IMEI {id} no encontrado"),
        }
    }
}

impl Inner {
    fn take_failure(&mut self) -> Result<()> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl RecordStore for MemoryStore {
    fn list(&self) -> Result<Vec<Record>> {
        let mut inner = self.lock();
        inner.take_failure()?;
        Ok(inner.records.clone())
    }

    fn create(&self, record: &NewRecord) -> Result<()> {
        let mut inner = self.lock();
        inner.take_failure()?;
        inner.next_id += 1;
        let now = Utc::now();
        let id = RecordId::from(inner.next_id);
        debug!(%id, imei = %record.imei, "memory store create");
        inner.records.push(Record {
            id,
            imei: record.imei.clone(),
            estado: record.estado,
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }

    fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
        let mut inner = self.lock();
        inner.take_failure()?;
        let record = inner
            .records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        record.imei.clone_from(&patch.imei);
        record.estado = patch.estado;
        record.updated_at = Utc::now();
        Ok(())
    }

    fn delete(&self, id: &RecordId) -> Result<DeleteAck> {
        let mut inner = self.lock();
        inner.take_failure()?;
        let position = inner
            .records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        let removed = inner.records.remove(position);
        Ok(DeleteAck {
            message: Some(format!("IMEI {} eliminado", removed.imei)),
        })
    }
}
