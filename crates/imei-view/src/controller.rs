//! Request/response bookkeeping around [`InventoryState`].
//!
//! The controller never talks to the network. It hands out [`Request`]s
//! tagged with a [`Ticket`] and later accepts the matching [`Response`]:
//!
//! - a successful mutation yields a follow-up `List` request (explicit refresh);
//! - a list response older than the newest issued list is discarded, so
//!   overlapping refreshes cannot roll the collection back;
//! - after [`Controller::dispose`] every response is discarded;
//! - a failed response leaves the collection, selection, and draft untouched
//!   and sets a user-facing notice;
//! - a failed follow-up refresh does not turn the mutation before it into a
//!   failure: the mutation notice is kept and marked as not yet listed.

use std::collections::BTreeMap;
use std::fmt;

use imei_model::{DeleteAck, Estado, NewRecord, Record, RecordId, RecordPatch, ValidationError};
use imei_store::StoreError;
use tracing::{debug, info, warn};

use crate::state::InventoryState;

const LIST_FAILED: &str = "Error al obtener los IMEIs";
const REFRESH_FAILED_SUFFIX: &str = "no se pudo actualizar la lista";

/// Monotonic request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Operation to perform against the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    List,
    Create(NewRecord),
    Update { id: RecordId, patch: RecordPatch },
    Delete(RecordId),
}

impl RequestKind {
    fn label(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete(_) => "delete",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Self::List => LIST_FAILED,
            Self::Create(_) => "Error al agregar IMEI",
            Self::Update { .. } => "Error al actualizar IMEI",
            Self::Delete(_) => "Error al eliminar IMEI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub ticket: Ticket,
    pub kind: RequestKind,
}

/// Successful store result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listed(Vec<Record>),
    Created,
    Updated,
    Deleted(DeleteAck),
}

#[derive(Debug, Clone)]
pub struct Response {
    pub ticket: Ticket,
    pub result: Result<Outcome, StoreError>,
}

/// What [`Controller::apply`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The response was stale, unknown, or arrived after disposal.
    Discarded,
    /// State was updated; `refresh` must be dispatched when present.
    Updated { refresh: Option<Request> },
    /// The store reported an error; prior state is kept.
    Failed(StoreError),
    /// The mutation was acknowledged but the refresh after it failed, so
    /// the collection is out of date.
    RefreshFailed(StoreError),
}

/// Owner of the inventory state and of in-flight request tickets.
#[derive(Debug, Default)]
pub struct Controller {
    state: InventoryState,
    next_ticket: u64,
    pending: BTreeMap<Ticket, RequestKind>,
    /// Refresh tickets issued after a mutation, with that mutation's notice.
    follow_ups: BTreeMap<Ticket, String>,
    latest_list: Option<Ticket>,
    disposed: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InventoryState {
        &self.state
    }

    /// Mutable access for the synchronous view transitions
    /// (filter, search, selection, drafts).
    pub fn state_mut(&mut self) -> &mut InventoryState {
        &mut self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Number of requests issued but not yet answered.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Stop applying responses. Pending requests are forgotten.
    pub fn dispose(&mut self) {
        if !self.disposed {
            debug!(pending = self.pending.len(), "controller disposed");
        }
        self.disposed = true;
        self.pending.clear();
        self.follow_ups.clear();
    }

    fn issue(&mut self, kind: RequestKind) -> Request {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        if kind == RequestKind::List {
            self.latest_list = Some(ticket);
            self.state.mark_loading();
        }
        debug!(%ticket, kind = kind.label(), "issuing request");
        self.pending.insert(ticket, kind.clone());
        Request { ticket, kind }
    }

    // =========================================================================
    // Request constructors
    // =========================================================================

    /// Request the full collection.
    pub fn refresh(&mut self) -> Request {
        self.issue(RequestKind::List)
    }

    /// Record a completed mutation and request the refresh that follows it.
    fn refresh_after(&mut self, notice: String) -> Applied {
        self.state.set_notice(notice.clone());
        let refresh = self.refresh();
        self.follow_ups.insert(refresh.ticket, notice);
        Applied::Updated {
            refresh: Some(refresh),
        }
    }

    /// Request creation of a new record.
    pub fn add(&mut self, imei: &str, estado: Estado) -> Result<Request, ValidationError> {
        let body = NewRecord::new(imei, estado)?;
        Ok(self.issue(RequestKind::Create(body)))
    }

    /// Request an update from the active edit draft.
    pub fn save_edit(&mut self) -> Result<Request, ValidationError> {
        let (id, patch) = self.state.commit_edit()?;
        Ok(self.issue(RequestKind::Update { id, patch }))
    }

    /// Request deletion of a record of the current collection.
    pub fn delete(&mut self, id: &RecordId) -> Result<Request, ValidationError> {
        if self.state.record(id).is_none() {
            return Err(ValidationError::UnknownRecord(id.clone()));
        }
        Ok(self.issue(RequestKind::Delete(id.clone())))
    }

    // =========================================================================
    // Responses
    // =========================================================================

    /// Apply a store response, subject to the liveness and staleness checks.
    pub fn apply(&mut self, response: Response) -> Applied {
        if self.disposed {
            debug!(ticket = %response.ticket, "discarding response after disposal");
            return Applied::Discarded;
        }
        let Some(kind) = self.pending.remove(&response.ticket) else {
            warn!(ticket = %response.ticket, "discarding response for unknown ticket");
            return Applied::Discarded;
        };

        match response.result {
            Ok(outcome) => self.apply_outcome(response.ticket, kind, outcome),
            Err(err) => {
                warn!(
                    ticket = %response.ticket,
                    kind = kind.label(),
                    error = %err,
                    "request failed"
                );
                if kind == RequestKind::List {
                    let follow_up = self.follow_ups.remove(&response.ticket);
                    if self.latest_list != Some(response.ticket) {
                        return Applied::Discarded;
                    }
                    self.state.mark_load_failed(LIST_FAILED);
                    if let Some(done) = follow_up {
                        self.state
                            .set_notice(format!("{done}; {REFRESH_FAILED_SUFFIX}"));
                        return Applied::RefreshFailed(err);
                    }
                }
                self.state.set_notice(kind.failure_message());
                Applied::Failed(err)
            }
        }
    }

    fn apply_outcome(&mut self, ticket: Ticket, kind: RequestKind, outcome: Outcome) -> Applied {
        match (kind, outcome) {
            (RequestKind::List, Outcome::Listed(records)) => {
                self.follow_ups.remove(&ticket);
                if self.latest_list != Some(ticket) {
                    debug!(%ticket, "discarding superseded list response");
                    return Applied::Discarded;
                }
                info!(count = records.len(), "records loaded");
                self.state.load(records);
                Applied::Updated { refresh: None }
            }
            (RequestKind::Create(body), Outcome::Created) => {
                info!(imei = %body.imei, "record created");
                self.refresh_after(format!("IMEI {} agregado", body.imei))
            }
            (RequestKind::Update { id, .. }, Outcome::Updated) => {
                info!(%id, "record updated");
                self.state.finish_edit(&id);
                self.refresh_after("IMEI actualizado".to_string())
            }
            (RequestKind::Delete(id), Outcome::Deleted(ack)) => {
                info!(%id, "record deleted");
                let message = ack.message.unwrap_or_else(|| "IMEI eliminado".to_string());
                self.refresh_after(message)
            }
            (kind, outcome) => {
                warn!(
                    %ticket,
                    kind = kind.label(),
                    ?outcome,
                    "discarding response that does not match its request"
                );
                Applied::Discarded
            }
        }
    }
}
