//! Inventory record as served by the backend.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::enums::Estado;

/// Backend-assigned record identifier.
///
/// The backend may emit numeric or textual ids; both are kept as text so the
/// client never depends on the id's shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => RecordId(n.to_string()),
            RawId::Text(s) => RecordId(s),
        })
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// One tracked device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub imei: String,
    pub estado: Estado,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Returns true when the IMEI ends with `suffix`.
    ///
    /// Matching is exact and case-sensitive; an empty suffix matches every
    /// record.
    pub fn imei_ends_with(&self, suffix: &str) -> bool {
        self.imei.ends_with(suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        let numeric: RecordId = serde_json::from_str("42").expect("numeric id");
        let textual: RecordId = serde_json::from_str("\"a1b2\"").expect("text id");
        let huge: RecordId = serde_json::from_str("18446744073709551615").expect("u64 id");
        let float: RecordId = serde_json::from_str("7.0").expect("float id");
        assert_eq!(huge.as_str(), "18446744073709551615");
        assert_eq!(float.as_str(), "7.0");
        assert_eq!(numeric.as_str(), "42");
        assert_eq!(textual.as_str(), "a1b2");
    }

    #[test]
    fn record_deserializes_backend_payload() {
        let json = r#"{
            "id": 7,
            "imei": "356938035643809",
            "estado": "V",
            "createdAt": "2024-03-01T14:05:00.000Z",
            "updatedAt": "2024-03-02T09:30:15.000Z"
        }"#;
        let record: Record = serde_json::from_str(json).expect("deserialize record");
        assert_eq!(record.id, RecordId::from(7));
        assert_eq!(record.estado, Estado::Sold);
        assert!(record.imei_ends_with("3809"));
        assert!(!record.imei_ends_with("9999"));
    }
}
