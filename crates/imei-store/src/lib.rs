//! Record store adapter for the IMEI inventory.
//!
//! Talks to the remote collection endpoint (`GET/POST/PUT/DELETE /imeis`).
//! The adapter never retries and never refreshes on its own; callers issue an
//! explicit list after every successful mutation.

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod store;

pub use client::HttpRecordStore;
pub use config::{DEFAULT_BASE_URL, ListPath, StoreConfig};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::RecordStore;
