//! # Session State
//!
//! Everything the conversation owns, in one struct. Rebuilt fresh for every
//! run; nothing here is persisted.
//!
//! ```text
//! Session
//! ├── transcript: Vec<ExchangeEntry>   // user/assistant entries, submission order
//! ├── busy: bool                       // a request is in flight
//! ├── draft: String                    // text in the primary input
//! └── next_seq: u64                    // sequence number for the next submission
//! ```
//!
//! State changes only happen through `update(session, action)` in action.rs.

use chrono::{DateTime, Local};

use crate::backend::ResponsePayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One item in the transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeEntry {
    pub role: Role,
    pub content: String,
    /// Raw backend payload. Only assistant entries carry one.
    pub payload: Option<ResponsePayload>,
    /// Shared by a user entry and the assistant entry answering it.
    pub seq: u64,
    pub created_at: DateTime<Local>,
}

impl ExchangeEntry {
    pub fn user(seq: u64, content: String) -> Self {
        Self {
            role: Role::User,
            content,
            payload: None,
            seq,
            created_at: Local::now(),
        }
    }

    pub fn assistant(seq: u64, content: &str, payload: ResponsePayload) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
            payload: Some(payload),
            seq,
            created_at: Local::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub transcript: Vec<ExchangeEntry>,
    pub busy: bool,
    pub draft: String,
    next_seq: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user entry and returns the sequence number it was given.
    pub(crate) fn push_user(&mut self, content: String) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.transcript.push(ExchangeEntry::user(seq, content));
        seq
    }

    /// Places an assistant entry directly after the user entry with the same
    /// sequence number. Falls back to appending if that entry is gone.
    pub(crate) fn insert_assistant(&mut self, entry: ExchangeEntry) {
        let position = self
            .transcript
            .iter()
            .position(|e| e.role == Role::User && e.seq == entry.seq)
            .map(|i| i + 1);

        match position {
            Some(i) => self.transcript.insert(i, entry),
            None => self.transcript.push(entry),
        }
    }

    /// The most recent assistant entry, if any.
    pub fn last_assistant(&self) -> Option<&ExchangeEntry> {
        self.transcript
            .iter()
            .rev()
            .find(|e| e.role == Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_new_defaults() {
        let session = Session::new();
        assert!(session.transcript.is_empty());
        assert!(!session.busy);
        assert!(session.draft.is_empty());
    }

    #[test]
    fn test_push_user_assigns_increasing_seq() {
        let mut session = Session::new();
        let a = session.push_user("one".into());
        let b = session.push_user("two".into());
        assert!(b > a);
        assert_eq!(session.transcript[1].seq, b);
    }

    #[test]
    fn test_insert_assistant_pairs_by_seq() {
        let mut session = Session::new();
        let first = session.push_user("first".into());
        let second = session.push_user("second".into());

        // Completions arrive out of order.
        session.insert_assistant(ExchangeEntry::assistant(
            second,
            "b",
            ResponsePayload::default(),
        ));
        session.insert_assistant(ExchangeEntry::assistant(
            first,
            "a",
            ResponsePayload::default(),
        ));

        let order: Vec<(Role, u64)> = session
            .transcript
            .iter()
            .map(|e| (e.role, e.seq))
            .collect();
        assert_eq!(
            order,
            vec![
                (Role::User, first),
                (Role::Assistant, first),
                (Role::User, second),
                (Role::Assistant, second),
            ]
        );
    }

    #[test]
    fn test_insert_assistant_without_user_appends() {
        let mut session = Session::new();
        session.insert_assistant(ExchangeEntry::assistant(
            42,
            "orphan",
            ResponsePayload::default(),
        ));
        assert_eq!(session.transcript.len(), 1);
    }

    #[test]
    fn test_last_assistant() {
        let mut session = Session::new();
        assert!(session.last_assistant().is_none());
        let seq = session.push_user("q".into());
        session.insert_assistant(ExchangeEntry::assistant(
            seq,
            "r",
            ResponsePayload::default(),
        ));
        assert_eq!(session.last_assistant().unwrap().content, "r");
    }
}
