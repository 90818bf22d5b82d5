//! Data model for the IMEI inventory.
//!
//! Records mirror the JSON documents served by the inventory backend. The
//! remaining types describe request bodies and the error taxonomy shared by
//! the store, view, and export crates.

pub mod enums;
pub mod error;
pub mod record;
pub mod request;

pub use enums::{Estado, StateFilter};
pub use error::{InventoryError, Result, ValidationError};
pub use record::{Record, RecordId};
pub use request::{DeleteAck, NewRecord, RecordPatch};
