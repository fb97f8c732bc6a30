//! Plain-text layout of rendered sections.
//!
//! Used as-is by the one-shot `--query` mode, and for table layout by the TUI.

use textwrap::Options;
use unicode_width::UnicodeWidthStr;

use super::{Section, Table, Visualization};

/// Widest a single table column may grow before its cells are truncated.
pub const MAX_COLUMN_WIDTH: usize = 40;

/// Column at which list items wrap in plain-text output.
pub const WRAP_WIDTH: usize = 100;

/// Lays a table out as aligned text lines: header, rule, one line per row.
pub fn table_lines(table: &Table) -> Vec<String> {
    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            table
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| display_width(cell))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    lines.push(join_cells(table.headers.iter(), &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    for row in &table.rows {
        lines.push(join_cells(row.iter(), &widths));
    }
    lines
}

fn join_cells<'a>(cells: impl Iterator<Item = &'a String>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| pad(&truncate(cell, *width), *width))
        .collect::<Vec<_>>()
        .join(" │ ")
        .trim_end()
        .to_string()
}

/// Cells are single-line: embedded newlines are flattened to spaces.
fn display_width(cell: &str) -> usize {
    cell.replace('\n', " ").width()
}

fn truncate(cell: &str, width: usize) -> String {
    let flat = cell.replace('\n', " ");
    if flat.width() <= width {
        return flat;
    }
    let mut out = String::new();
    let mut used = 0;
    for c in flat.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{cell}{}", " ".repeat(fill))
}

/// One-line description of the image carried by a visualization.
pub fn image_summary(vis: &Visualization) -> String {
    match &vis.image {
        Some(bytes) if vis.is_png() => format!("[PNG image, {}]", human_size(bytes.len())),
        Some(bytes) => format!("[image, {}, not a PNG]", human_size(bytes.len())),
        None => "[image could not be decoded]".to_string(),
    }
}

fn human_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

/// Formats sections as plain text, one titled block per section.
pub fn format_sections(sections: &[Section]) -> String {
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("## {}\n", section.title()));
        match section {
            Section::Error(message) => {
                out.push_str(message);
                out.push('\n');
            }
            Section::KeyPoints(items) => {
                for item in items {
                    push_item(&mut out, "• ", item);
                }
            }
            Section::RelatedInsights(items) => {
                for item in items {
                    push_item(&mut out, "→ ", item);
                }
            }
            Section::DataTable(table) => {
                for line in table_lines(table) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            Section::Visualization(vis) => {
                if !vis.caption.is_empty() {
                    out.push_str(&vis.caption);
                    out.push('\n');
                }
                out.push_str(&image_summary(vis));
                out.push('\n');
            }
            Section::FollowUps(items) => {
                for (n, item) in items.iter().enumerate() {
                    push_item(&mut out, &format!("{}. ", n + 1), item);
                }
            }
        }
    }
    out
}

/// Appends one list item, wrapped with a hanging indent under `marker`.
fn push_item(out: &mut String, marker: &str, text: &str) {
    let indent = " ".repeat(marker.width());
    let options = Options::new(WRAP_WIDTH)
        .initial_indent(marker)
        .subsequent_indent(&indent);
    if text.trim().is_empty() {
        out.push_str(marker.trim_end());
    } else {
        out.push_str(&textwrap::fill(text, options));
    }
    out.push('\n');
}
