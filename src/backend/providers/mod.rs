pub mod http;

pub use http::{DEFAULT_BACKEND_URL, HttpBackend, SourceFeedback};
