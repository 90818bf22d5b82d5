//! Synchronous driver connecting a [`Controller`] to a [`RecordStore`].

use imei_model::{Estado, InventoryError, RecordId};
use imei_store::RecordStore;
use tracing::{debug, warn};

use crate::controller::{Applied, Controller, Outcome, Request, RequestKind, Response};
use crate::state::InventoryState;

/// One interactive session: a store plus the controller it feeds.
///
/// Each action sends one request and, after a successful mutation, the
/// refresh the controller asks for. Failures are returned after the
/// controller has recorded them; nothing is retried. A mutation whose
/// refresh fails still succeeds, with the stale list noted in the notice.
pub struct Session<S> {
    store: S,
    controller: Controller,
}

impl<S: RecordStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            controller: Controller::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    pub fn state(&self) -> &InventoryState {
        self.controller.state()
    }

    pub fn state_mut(&mut self) -> &mut InventoryState {
        self.controller.state_mut()
    }

    /// Fetch the full collection.
    pub fn load(&mut self) -> Result<(), InventoryError> {
        let request = self.controller.refresh();
        self.dispatch(request)
    }

    pub fn add(&mut self, imei: &str, estado: Estado) -> Result<(), InventoryError> {
        let request = self.controller.add(imei, estado)?;
        self.dispatch(request)
    }

    /// Send the active edit draft.
    pub fn save_edit(&mut self) -> Result<(), InventoryError> {
        let request = self.controller.save_edit()?;
        self.dispatch(request)
    }

    pub fn delete(&mut self, id: &RecordId) -> Result<(), InventoryError> {
        let request = self.controller.delete(id)?;
        self.dispatch(request)
    }

    /// Execute `request` and any refresh it triggers.
    pub fn dispatch(&mut self, request: Request) -> Result<(), InventoryError> {
        let mut next = Some(request);
        while let Some(request) = next.take() {
            let response = self.execute(request);
            match self.controller.apply(response) {
                Applied::Updated { refresh } => next = refresh,
                Applied::Discarded => {}
                Applied::Failed(err) => return Err(err.into()),
                Applied::RefreshFailed(err) => {
                    warn!(error = %err, "mutation applied but the list is stale");
                }
            }
        }
        Ok(())
    }

    fn execute(&self, request: Request) -> Response {
        debug!(ticket = %request.ticket, "executing request");
        let result = match request.kind {
            RequestKind::List => self.store.list().map(Outcome::Listed),
            RequestKind::Create(body) => self.store.create(&body).map(|()| Outcome::Created),
            RequestKind::Update { id, patch } => {
                self.store.update(&id, &patch).map(|()| Outcome::Updated)
            }
            RequestKind::Delete(id) => self.store.delete(&id).map(Outcome::Deleted),
        };
        Response {
            ticket: request.ticket,
            result,
        }
    }
}
