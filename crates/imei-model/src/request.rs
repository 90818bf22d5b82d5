//! Request and acknowledgement bodies exchanged with the backend.

use serde::{Deserialize, Serialize};

use crate::enums::Estado;
use crate::error::ValidationError;

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub imei: String,
    pub estado: Estado,
}

impl NewRecord {
    /// Build a create body, rejecting a blank IMEI.
    pub fn new(imei: &str, estado: Estado) -> Result<Self, ValidationError> {
        let imei = imei.trim();
        if imei.is_empty() {
            return Err(ValidationError::MissingImei);
        }
        Ok(Self {
            imei: imei.to_string(),
            estado,
        })
    }
}

/// Body of an update request. The backend expects both fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub imei: String,
    pub estado: Estado,
}

impl RecordPatch {
    pub fn new(imei: &str, estado: Estado) -> Result<Self, ValidationError> {
        let imei = imei.trim();
        if imei.is_empty() {
            return Err(ValidationError::MissingImei);
        }
        Ok(Self {
            imei: imei.to_string(),
            estado,
        })
    }
}

/// Delete confirmation payload (`{message?}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
