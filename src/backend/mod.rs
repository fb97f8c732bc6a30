pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{BackendError, ResearchBackend};
pub use providers::{HttpBackend, SourceFeedback};
pub use types::{Graph, Insight, ResearchRequest, ResponsePayload, Row, SourceAck, SourceRequest};
