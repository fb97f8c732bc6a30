use std::fmt;

use async_trait::async_trait;

use super::types::ResponsePayload;

/// Errors that can occur while talking to the research backend.
///
/// The conversation layer collapses all of these into one generic error
/// entry; the variants exist for logging and for the CLI feedback commands.
#[derive(Debug)]
pub enum BackendError {
    /// Backend misconfigured (bad base URL, client build failure).
    Config(String),
    /// Rejected locally before any request was sent.
    InvalidInput(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Non-success status from an endpoint that branches on status.
    Api { status: u16, message: String },
    /// The body could not be decoded into the expected shape.
    Decode(String),
    /// The request task panicked or was aborted.
    Task(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "config error: {msg}"),
            BackendError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            BackendError::Decode(msg) => write!(f, "decode error: {msg}"),
            BackendError::Task(msg) => write!(f, "request task failed: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Network(e.to_string())
        }
    }
}

/// Something that can answer a research query.
#[async_trait]
pub trait ResearchBackend: Send + Sync {
    /// Short label for logs and the title bar.
    fn name(&self) -> &str;

    /// Sends one query and returns the decoded payload, forwarded unmodified.
    async fn research(&self, query: &str) -> Result<ResponsePayload, BackendError>;
}
