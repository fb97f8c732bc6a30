//! HTTP research backend.
//!
//! Talks to the TrustSight research server:
//! - `POST /research` with `{"query": ...}` → `ResponsePayload`
//! - `POST /approve_source` / `POST /flag_source` with `{"source": ...}` → `{"message": ...}`
//!
//! The research call decodes the body whatever the status code is; only a
//! body that fails to decode counts as a failure. The feedback calls do
//! check the status, since they are plain request/acknowledge endpoints.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::backend::{
    BackendError, ResearchBackend, ResearchRequest, ResponsePayload, SourceAck, SourceRequest,
};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Which feedback endpoint to hit for a source URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFeedback {
    Approve,
    Flag,
}

impl SourceFeedback {
    fn path(self) -> &'static str {
        match self {
            SourceFeedback::Approve => "approve_source",
            SourceFeedback::Flag => "flag_source",
        }
    }
}

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a backend rooted at `base_url` (trailing slashes are dropped).
    ///
    /// `timeout` is an optional whole-request limit. Without one a request
    /// that never completes keeps the session busy.
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(BackendError::Config(format!(
                "backend URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reports a source URL as trustworthy or unreliable.
    pub async fn send_feedback(
        &self,
        kind: SourceFeedback,
        source: &str,
    ) -> Result<String, BackendError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(BackendError::InvalidInput(
                "source URL cannot be empty".to_string(),
            ));
        }

        info!("Sending {:?} feedback for {}", kind, source);
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, kind.path()))
            .json(&SourceRequest { source })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Feedback endpoint error: {} - {}", status, message);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let ack: SourceAck = response.json().await?;
        Ok(ack.message)
    }
}

#[async_trait]
impl ResearchBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn research(&self, query: &str) -> Result<ResponsePayload, BackendError> {
        info!("Research request: {} chars", query.len());

        let response = self
            .client
            .post(format!("{}/research", self.base_url))
            .json(&ResearchRequest { query })
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Research endpoint returned HTTP {}", status.as_u16());
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        debug!("Research response: {} bytes", body.len());

        serde_json::from_str::<ResponsePayload>(&body)
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let backend = HttpBackend::new(None, None).unwrap();
        assert_eq!(backend.base_url(), DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let backend = HttpBackend::new(Some("http://research.local:9000/".into()), None).unwrap();
        assert_eq!(backend.base_url(), "http://research.local:9000");
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        let result = HttpBackend::new(Some("localhost:8000".into()), None);
        assert!(matches!(result, Err(BackendError::Config(_))));
    }

    #[test]
    fn test_feedback_paths() {
        assert_eq!(SourceFeedback::Approve.path(), "approve_source");
        assert_eq!(SourceFeedback::Flag.path(), "flag_source");
    }

    #[tokio::test]
    async fn test_empty_source_rejected_without_request() {
        // Port 9 (discard) is never contacted: validation fails first.
        let backend = HttpBackend::new(Some("http://127.0.0.1:9".into()), None).unwrap();
        let result = backend.send_feedback(SourceFeedback::Flag, "   ").await;
        assert!(matches!(result, Err(BackendError::InvalidInput(_))));
    }
}
