//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{BackendError, ResearchBackend, ResponsePayload};

/// In-memory backend that answers every query the same way and records
/// what it was asked.
pub struct ScriptedBackend {
    reply: Option<ResponsePayload>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn ok(payload: ResponsePayload) -> Self {
        Self {
            reply: Some(payload),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every query fails with a network error.
    pub fn failing() -> Self {
        Self {
            reply: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResearchBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn research(&self, query: &str) -> Result<ResponsePayload, BackendError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.reply
            .clone()
            .ok_or_else(|| BackendError::Network("connection refused".to_string()))
    }
}

/// Backend whose request task panics.
pub struct PanickingBackend;

#[async_trait]
impl ResearchBackend for PanickingBackend {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn research(&self, _query: &str) -> Result<ResponsePayload, BackendError> {
        panic!("backend blew up");
    }
}
