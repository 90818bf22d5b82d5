//! Connection settings for the record backend.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Collection endpoint used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/imeis";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which path serves the full collection.
///
/// Deployments differ: some expose the list at the collection root, others
/// at `/all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListPath {
    /// `GET {base}`
    #[default]
    Plain,
    /// `GET {base}/all`
    All,
}

impl fmt::Display for ListPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::All => f.write_str("all"),
        }
    }
}

/// Store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Collection URL, e.g. `http://localhost:3000/imeis`.
    pub base_url: String,
    pub list_path: ListPath,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_path: ListPath::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_list_path(mut self, list_path: ListPath) -> Self {
        self.list_path = list_path;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Collection URL without a trailing slash.
    pub fn collection_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// URL serving the full list.
    pub fn list_url(&self) -> String {
        match self.list_path {
            ListPath::Plain => self.collection_url().to_string(),
            ListPath::All => format!("{}/all", self.collection_url()),
        }
    }

    /// URL of a single record.
    pub fn record_url(&self, id: &str) -> String {
        format!("{}/{id}", self.collection_url())
    }
}
