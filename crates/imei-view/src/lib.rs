//! Client-side view model for the IMEI inventory.
//!
//! - [`projection`]: status filter + suffix search over the full collection.
//! - [`selection`]: selection set bookkeeping and the full-selection export gate.
//! - [`state`]: the explicit state struct and its named transitions.
//! - [`controller`]: request/response tickets with refresh and liveness handling.
//! - [`session`]: drives controller requests through a [`imei_store::RecordStore`].

pub mod controller;
pub mod projection;
pub mod selection;
pub mod session;
pub mod state;

pub use controller::{Applied, Controller, Outcome, Request, RequestKind, Response, Ticket};
pub use projection::{ViewFilter, project};
pub use selection::{Selection, validate_full_selection};
pub use session::Session;
pub use state::{EditDraft, InventoryState, LoadStatus};
