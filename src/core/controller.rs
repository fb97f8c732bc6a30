//! # Conversation Controller
//!
//! Executes the `Effect::SpawnRequest` produced by `update()` against a
//! `ResearchBackend` and feeds the outcome back as `Action::ResponseReceived`.
//!
//! Two ways to drive it:
//! - [`Controller::submit`] awaits the whole exchange in-line (one-shot mode, tests).
//! - [`Controller::spawn`] runs the request as a tokio task and reports over a
//!   channel (the TUI event loop). The returned `JoinHandle` can be aborted.

use std::sync::{Arc, mpsc};

use log::{info, warn};
use tokio::task::JoinHandle;

use crate::backend::{BackendError, ResearchBackend, ResponsePayload};
use crate::core::action::{Action, Effect, PendingRequest, SubmitOrigin, update};
use crate::core::state::Session;

#[derive(Clone)]
pub struct Controller {
    backend: Arc<dyn ResearchBackend>,
}

impl Controller {
    pub fn new(backend: Arc<dyn ResearchBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Submits `text` and waits for the assistant entry to land.
    ///
    /// Returns `false` when the submission was dropped (blank text or a
    /// request already in flight). On return `session.busy` is false.
    pub async fn submit(&self, session: &mut Session, text: &str, origin: SubmitOrigin) -> bool {
        let effect = update(
            session,
            Action::Submit {
                text: text.to_string(),
                origin,
            },
        );
        let Effect::SpawnRequest(request) = effect else {
            return false;
        };

        let seq = request.seq;
        let outcome = run_request(self.backend.clone(), request).await;
        update(session, Action::ResponseReceived { seq, outcome });
        true
    }

    /// Runs `request` on the tokio runtime and sends the outcome to `tx`.
    pub fn spawn(&self, request: PendingRequest, tx: mpsc::Sender<Action>) -> JoinHandle<()> {
        info!("Spawning research request #{}", request.seq);
        let backend = self.backend.clone();
        tokio::spawn(async move {
            let seq = request.seq;
            let outcome = run_request(backend, request).await;
            if tx.send(Action::ResponseReceived { seq, outcome }).is_err() {
                warn!("Failed to deliver response #{}: receiver dropped", seq);
            }
        })
    }
}

/// Issues the backend call in its own task so a panic inside the backend
/// still produces an outcome instead of leaving the session busy.
async fn run_request(
    backend: Arc<dyn ResearchBackend>,
    request: PendingRequest,
) -> Result<ResponsePayload, BackendError> {
    let inner = tokio::spawn(async move { backend.research(&request.query).await });
    match inner.await {
        Ok(outcome) => outcome,
        Err(e) => Err(BackendError::Task(e.to_string())),
    }
}
