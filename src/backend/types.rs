use indexmap::IndexMap;
use log::warn;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single table row: column name → cell value, in the backend's key order.
pub type Row = Map<String, Value>;

/// Body of `POST /research`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResearchRequest<'a> {
    pub query: &'a str,
}

/// Body of `POST /approve_source` and `POST /flag_source`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SourceRequest<'a> {
    pub source: &'a str,
}

/// Acknowledgement returned by the source feedback endpoints.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SourceAck {
    pub message: String,
}

/// One bullet in `points` or `related_insights`.
///
/// The backend also scores each bullet; the scores are kept so a display
/// layer can surface them, but the core sections only use `text`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Insight {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub text: String,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub trust_score: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence: Option<f64>,
}

impl Insight {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Rendered chart: a base64 PNG plus its caption.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Graph {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub image_base64: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub explanation: String,
}

/// Backend result for one query.
///
/// Every field is independently optional. Unknown fields are ignored, so a
/// body with no recognized field decodes to `ResponsePayload::default()`.
///
/// Fields are decoded one at a time: a field (or list element, or map entry)
/// with an unexpected shape is dropped and logged, the rest still decode.
/// Only a body that is not a JSON object fails.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ResponsePayload {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub points: Option<IndexMap<String, Insight>>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub table: Option<Vec<Row>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub graph: Option<Graph>,
    #[serde(
        default,
        deserialize_with = "lenient_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub related_insights: Option<IndexMap<String, Insight>>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub follow_up_suggestions: Option<Vec<String>>,
}

/// `null` (or a missing field) becomes an empty string.
fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes the whole field as `T`, or drops it.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            warn!("Dropping malformed response field: {}", e);
            Ok(None)
        }
    }
}

/// Keeps the list elements that decode as `T`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(None),
        _ => {
            warn!("Dropping response field: expected a list");
            return Ok(None);
        }
    };
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if kept.len() < total {
        warn!("Dropped {} malformed list item(s)", total - kept.len());
    }
    Ok(Some(kept))
}

/// Keeps the map entries whose values decode as `T`, in backend order.
fn lenient_map<'de, D, T>(deserializer: D) -> Result<Option<IndexMap<String, T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries,
        Value::Null => return Ok(None),
        _ => {
            warn!("Dropping response field: expected an object");
            return Ok(None);
        }
    };
    let total = entries.len();
    let kept: IndexMap<String, T> = entries
        .into_iter()
        .filter_map(|(key, value)| serde_json::from_value(value).ok().map(|v| (key, v)))
        .collect();
    if kept.len() < total {
        warn!("Dropped {} malformed entry(ies)", total - kept.len());
    }
    Ok(Some(kept))
}

impl ResponsePayload {
    /// Payload carrying only an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// The error message, if one is set and non-empty.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}
