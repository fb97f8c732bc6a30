//! # Response Renderer
//!
//! Turns a `ResponsePayload` into the ordered list of sections a display
//! layer shows. Pure: no I/O, same payload in, same sections out.
//!
//! ```text
//! error?  ──yes──▶ [Error]
//!   │no
//!   ▼
//! points ─▶ table ─▶ graph ─▶ related_insights ─▶ follow_up_suggestions
//! (each independently present or skipped, always in this order)
//! ```

pub mod plain;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use log::warn;
use serde_json::Value;

use crate::backend::{Graph, Insight, ResponsePayload, Row};

/// PNG file signature.
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Keys of the first row, in that row's key order.
    pub headers: Vec<String>,
    /// One entry per input row, one cell per header.
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Visualization {
    pub caption: String,
    /// Decoded image bytes, `None` if the base64 was malformed.
    pub image: Option<Vec<u8>>,
}

impl Visualization {
    pub fn is_png(&self) -> bool {
        self.image
            .as_deref()
            .is_some_and(|bytes| bytes.starts_with(PNG_SIGNATURE))
    }
}

/// One renderable unit of an assistant reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Error(String),
    KeyPoints(Vec<String>),
    DataTable(Table),
    Visualization(Visualization),
    RelatedInsights(Vec<String>),
    /// Each suggestion re-enters the controller as a follow-up submission.
    FollowUps(Vec<String>),
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Error(_) => "Error",
            Section::KeyPoints(_) => "Key Points",
            Section::DataTable(_) => "Data Table",
            Section::Visualization(_) => "Visualization",
            Section::RelatedInsights(_) => "Related Insights",
            Section::FollowUps(_) => "Follow-up Questions",
        }
    }
}

pub fn render(payload: &ResponsePayload) -> Vec<Section> {
    if let Some(error) = payload.error_message() {
        return vec![Section::Error(error.to_string())];
    }

    let mut sections = Vec::new();

    if let Some(points) = non_empty_map(&payload.points) {
        sections.push(Section::KeyPoints(texts(points)));
    }
    if let Some(rows) = payload.table.as_deref().filter(|rows| !rows.is_empty()) {
        sections.push(Section::DataTable(build_table(rows)));
    }
    if let Some(graph) = payload
        .graph
        .as_ref()
        .filter(|g| !g.image_base64.is_empty())
    {
        sections.push(Section::Visualization(build_visualization(graph)));
    }
    if let Some(insights) = non_empty_map(&payload.related_insights) {
        sections.push(Section::RelatedInsights(texts(insights)));
    }
    if let Some(suggestions) = payload
        .follow_up_suggestions
        .as_ref()
        .filter(|s| !s.is_empty())
    {
        sections.push(Section::FollowUps(suggestions.clone()));
    }

    sections
}

fn non_empty_map(
    map: &Option<IndexMap<String, Insight>>,
) -> Option<&IndexMap<String, Insight>> {
    map.as_ref().filter(|m| !m.is_empty())
}

fn texts(map: &IndexMap<String, Insight>) -> Vec<String> {
    map.values().map(|item| item.text.clone()).collect()
}

/// Columns come from the first row only. A later row missing a column gets
/// a blank cell; keys the first row lacks are dropped.
fn build_table(rows: &[Row]) -> Table {
    let headers: Vec<String> = rows
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default();

    let rows = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|key| row.get(key).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    Table { headers, rows }
}

/// Strings render raw; everything else renders as its JSON text.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn build_visualization(graph: &Graph) -> Visualization {
    let image = match STANDARD.decode(graph.image_base64.trim()) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("Graph image is not valid base64: {}", e);
            None
        }
    };
    Visualization {
        caption: graph.explanation.clone(),
        image,
    }
}
