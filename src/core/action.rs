//! # Actions
//!
//! Everything that can happen to a session becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! Backend answers? That's `Action::ResponseReceived`.
//!
//! `update()` applies an action to the session and returns an `Effect`
//! describing the I/O the caller must perform. No I/O happens here.
//!
//! ```text
//! Session + Action  →  update()  →  Session' + Effect
//! ```

use log::{debug, info, warn};

use crate::backend::{BackendError, ResponsePayload};
use crate::core::state::{ExchangeEntry, Session};

/// Lead-in caption of a successful assistant entry.
pub const RESULTS_CAPTION: &str = "Here are the research results:";
/// Caption and payload message of a failed request.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data.";

/// Where a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOrigin {
    /// The primary input box. Clears the draft.
    Draft,
    /// A follow-up suggestion. Leaves the draft alone.
    FollowUp,
}

#[derive(Debug)]
pub enum Action {
    /// The primary input text changed.
    DraftChanged(String),
    Submit {
        text: String,
        origin: SubmitOrigin,
    },
    /// The request with sequence number `seq` finished.
    ResponseReceived {
        seq: u64,
        outcome: Result<ResponsePayload, BackendError>,
    },
    Quit,
}

/// A request the caller must issue on behalf of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub seq: u64,
    /// Trimmed query text.
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    SpawnRequest(PendingRequest),
    Quit,
}

pub fn update(session: &mut Session, action: Action) -> Effect {
    match action {
        Action::DraftChanged(text) => {
            session.draft = text;
            Effect::None
        }
        Action::Submit { text, origin } => {
            let query = text.trim();
            if query.is_empty() {
                debug!("Ignoring empty submission");
                return Effect::None;
            }
            if session.busy {
                warn!("Submission refused: a request is already in flight");
                return Effect::None;
            }

            let query = query.to_string();
            let seq = session.push_user(text);
            if origin == SubmitOrigin::Draft {
                session.draft.clear();
            }
            session.busy = true;
            info!("Submitted query #{} ({:?})", seq, origin);
            Effect::SpawnRequest(PendingRequest { seq, query })
        }
        Action::ResponseReceived { seq, outcome } => {
            let entry = match outcome {
                Ok(payload) => ExchangeEntry::assistant(seq, RESULTS_CAPTION, payload),
                Err(e) => {
                    warn!("Query #{} failed: {}", seq, e);
                    ExchangeEntry::assistant(
                        seq,
                        FETCH_ERROR_MESSAGE,
                        ResponsePayload::error(FETCH_ERROR_MESSAGE),
                    )
                }
            };
            session.insert_assistant(entry);
            session.busy = false;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
