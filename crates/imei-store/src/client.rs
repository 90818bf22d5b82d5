//! HTTP client for the inventory REST endpoint.
//!
//! Wraps a blocking `reqwest` client. One call issues exactly one request;
//! there is no retry, caching, or backoff.

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, warn};

use imei_model::{DeleteAck, NewRecord, Record, RecordId, RecordPatch};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::store::RecordStore;

const CLIENT_NAME: &str = "imei-inventory";

/// Error payload returned by the backend on failures (`{error}` or `{message}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Record store backed by the remote REST collection.
pub struct HttpRecordStore {
    client: Client,
    config: StoreConfig,
}

impl HttpRecordStore {
    /// Create a store for the given endpoint configuration.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| StoreError::Setup(err.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn user_agent() -> String {
        format!("{CLIENT_NAME}/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Map a non-success response to [`StoreError::Status`].
    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|payload| payload.error.or(payload.message))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                } else {
                    body
                }
            });
        warn!(status = status.as_u16(), %message, "backend rejected request");
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl RecordStore for HttpRecordStore {
    fn list(&self) -> Result<Vec<Record>> {
        let url = self.config.list_url();
        debug!(%url, "fetching records");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, Self::user_agent())
            .header(ACCEPT, "application/json")
            .send()?;
        let records: Vec<Record> = Self::check_status(response)?.json()?;

        debug!(count = records.len(), "records fetched");
        Ok(records)
    }

    fn create(&self, record: &NewRecord) -> Result<()> {
        let url = self.config.collection_url();
        debug!(%url, imei = %record.imei, estado = record.estado.as_code(), "creating record");

        let response = self
            .client
            .post(url)
            .header(USER_AGENT, Self::user_agent())
            .json(record)
            .send()?;
        Self::check_status(response)?;
        Ok(())
    }

    fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
        let url = self.config.record_url(id.as_str());
        debug!(%url, imei = %patch.imei, estado = patch.estado.as_code(), "updating record");

        let response = self
            .client
            .put(&url)
            .header(USER_AGENT, Self::user_agent())
            .json(patch)
            .send()?;
        Self::check_status(response)?;
        Ok(())
    }

    fn delete(&self, id: &RecordId) -> Result<DeleteAck> {
        let url = self.config.record_url(id.as_str());
        debug!(%url, "deleting record");

        let response = self
            .client
            .delete(&url)
            .header(USER_AGENT, Self::user_agent())
            .send()?;
        let body = Self::check_status(response)?.text()?;

        // Some deployments answer 204 with no body.
        if body.trim().is_empty() {
            return Ok(DeleteAck::default());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let store = HttpRecordStore::new(StoreConfig::default());
        assert!(store.is_ok());
    }

    #[test]
    fn test_user_agent_names_client() {
        assert!(HttpRecordStore::user_agent().starts_with("imei-inventory/"));
    }
}
