use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::state::{ExchangeEntry, Role};
use crate::render::plain::{image_summary, table_lines};
use crate::render::{Section, render};
use crate::tui::palette::Palette;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Follow-up highlighting for the card that owns the live suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuggestionFocus {
    /// Suggestions respond to Tab/Enter (false on older cards or while busy).
    pub active: bool,
    pub highlighted: Option<usize>,
}

/// Sections shown on an entry's card; empty for user entries.
pub fn entry_sections(entry: &ExchangeEntry) -> Vec<Section> {
    entry.payload.as_ref().map(render).unwrap_or_default()
}

/// A transient component that renders one transcript entry.
///
/// User entries are a plain bubble with the query text. Assistant entries
/// show the caption followed by `sections`, which the caller computes once
/// with [`entry_sections`] and keeps across frames.
#[derive(Clone, Copy)]
pub struct EntryCard<'a> {
    pub entry: &'a ExchangeEntry,
    pub sections: &'a [Section],
    pub palette: Palette,
    pub focus: SuggestionFocus,
}

impl<'a> EntryCard<'a> {
    pub fn new(
        entry: &'a ExchangeEntry,
        sections: &'a [Section],
        palette: Palette,
        focus: SuggestionFocus,
    ) -> Self {
        Self {
            entry,
            sections,
            palette,
            focus,
        }
    }

    /// Height needed at `width`, borders included. Saturates at `u16::MAX`.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let lines = u16::try_from(self.paragraph().line_count(content_width)).unwrap_or(u16::MAX);
        lines.max(1).saturating_add(VERTICAL_OVERHEAD)
    }

    fn paragraph(&self) -> Paragraph<'static> {
        Paragraph::new(self.lines()).wrap(Wrap { trim: false })
    }

    fn lines(&self) -> Vec<Line<'static>> {
        match self.entry.role {
            Role::User => self
                .entry
                .content
                .lines()
                .map(|l| Line::from(l.to_string()))
                .collect(),
            Role::Assistant => self.assistant_lines(),
        }
    }

    fn assistant_lines(&self) -> Vec<Line<'static>> {
        let p = self.palette;
        let sections = self.sections;

        let mut lines = Vec::new();
        // The error card replaces the caption; the error text says it all.
        if !matches!(sections, [Section::Error(_)]) {
            lines.push(Line::styled(self.entry.content.clone(), p.dim()));
        }

        for section in sections {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            let title_style = match section {
                Section::Error(_) => Style::default().fg(p.error).add_modifier(Modifier::BOLD),
                _ => p.title(),
            };
            lines.push(Line::styled(section.title(), title_style));

            match section {
                Section::Error(message) => {
                    lines.push(Line::styled(message.clone(), Style::default().fg(p.error)));
                }
                Section::KeyPoints(items) => {
                    lines.extend(items.iter().map(|t| bullet("• ", t, p)));
                }
                Section::RelatedInsights(items) => {
                    lines.extend(items.iter().map(|t| bullet("→ ", t, p)));
                }
                Section::DataTable(table) => {
                    for (i, row) in table_lines(table).into_iter().enumerate() {
                        let style = if i == 0 {
                            Style::default().fg(p.text).add_modifier(Modifier::BOLD)
                        } else if i == 1 {
                            p.dim()
                        } else {
                            Style::default().fg(p.text)
                        };
                        lines.push(Line::styled(row, style));
                    }
                }
                Section::Visualization(vis) => {
                    if !vis.caption.is_empty() {
                        lines.push(Line::styled(vis.caption.clone(), Style::default().fg(p.text)));
                    }
                    lines.push(Line::styled(image_summary(vis), p.dim()));
                }
                Section::FollowUps(items) => {
                    for (i, item) in items.iter().enumerate() {
                        lines.push(self.suggestion_line(i, item));
                    }
                    if self.focus.active {
                        lines.push(Line::styled("Tab to select, Enter to ask", p.dim()));
                    }
                }
            }
        }
        lines
    }

    fn suggestion_line(&self, index: usize, text: &str) -> Line<'static> {
        let p = self.palette;
        let highlighted = self.focus.active && self.focus.highlighted == Some(index);
        let style = if !self.focus.active {
            p.dim()
        } else if highlighted {
            Style::default()
                .fg(p.accent)
                .bg(p.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.accent)
        };
        let marker = if highlighted { "▶ " } else { "  " };
        Line::from(vec![
            Span::styled(marker, style),
            Span::styled(format!("[{}] {}", index + 1, text), style),
        ])
    }

    fn role_label(&self) -> &'static str {
        match self.entry.role {
            Role::User => "you",
            Role::Assistant => "trustsight",
        }
    }
}

fn bullet(marker: &'static str, text: &str, p: Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled(marker, Style::default().fg(p.accent)),
        Span::styled(text.to_string(), Style::default().fg(p.text)),
    ])
}

impl<'a> Widget for EntryCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let color = match self.entry.role {
            Role::User => p.user,
            Role::Assistant => p.assistant,
        };
        let is_error = self
            .entry
            .payload
            .as_ref()
            .is_some_and(|payload| payload.error_message().is_some());
        let border_style = if is_error {
            Style::default().fg(p.error)
        } else {
            Style::default().fg(color)
        };

        let title = format!(
            "{} · {}",
            self.role_label(),
            self.entry.created_at.format("%H:%M")
        );
        let block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);
        self.paragraph().style(p.base()).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ResponsePayload;
    use crate::core::action::{FETCH_ERROR_MESSAGE, RESULTS_CAPTION};
    use crate::core::theme::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn palette() -> Palette {
        Palette::for_theme(Theme::Dark)
    }

    fn assistant(value: serde_json::Value) -> ExchangeEntry {
        let payload: ResponsePayload = serde_json::from_value(value).unwrap();
        ExchangeEntry::assistant(0, RESULTS_CAPTION, payload)
    }

    fn draw_entry(entry: &ExchangeEntry, focus: SuggestionFocus, width: u16) -> String {
        let sections = entry_sections(entry);
        draw(EntryCard::new(entry, &sections, palette(), focus), width)
    }

    fn draw(card: EntryCard, width: u16) -> String {
        let height = card.calculate_height(width);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| f.render_widget(card, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_user_card_height() {
        let entry = ExchangeEntry::user(0, "Single line".into());
        let card = EntryCard::new(&entry, &[], palette(), SuggestionFocus::default());
        assert_eq!(card.calculate_height(80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_zero_width_returns_minimum() {
        let entry = ExchangeEntry::user(0, "hello".into());
        let card = EntryCard::new(&entry, &[], palette(), SuggestionFocus::default());
        assert_eq!(card.calculate_height(HORIZONTAL_OVERHEAD), 1);
    }

    #[test]
    fn test_points_card_height_and_text() {
        let entry = assistant(json!({"points": {"a": {"text": "X"}, "b": {"text": "Y"}}}));
        let sections = entry_sections(&entry);
        let card = EntryCard::new(&entry, &sections, palette(), SuggestionFocus::default());
        // caption, blank, title, two bullets
        assert_eq!(card.calculate_height(80), 5 + VERTICAL_OVERHEAD);

        let text = draw(card, 80);
        assert!(text.contains(RESULTS_CAPTION));
        assert!(text.contains("Key Points"));
        assert!(text.contains("• X"));
        assert!(text.contains("• Y"));
    }

    #[test]
    fn test_error_card_shows_only_error() {
        let entry = ExchangeEntry::assistant(
            0,
            FETCH_ERROR_MESSAGE,
            ResponsePayload::error(FETCH_ERROR_MESSAGE),
        );
        let sections = entry_sections(&entry);
        let card = EntryCard::new(&entry, &sections, palette(), SuggestionFocus::default());
        assert_eq!(card.calculate_height(80), 2 + VERTICAL_OVERHEAD);
        let text = draw(card, 80);
        assert!(text.contains("Error"));
        assert!(text.contains(FETCH_ERROR_MESSAGE));
    }

    #[test]
    fn test_table_card_renders_headers() {
        let entry = assistant(json!({"table": [{"name": "Go", "year": 2009}]}));
        let text = draw_entry(&entry, SuggestionFocus::default(), 80);
        assert!(text.contains("Data Table"));
        assert!(text.contains("name │ year"));
        assert!(text.contains("Go   │ 2009"));
    }

    #[test]
    fn test_empty_payload_shows_caption_only() {
        let entry = assistant(json!({}));
        let sections = entry_sections(&entry);
        assert!(sections.is_empty());
        let card = EntryCard::new(&entry, &sections, palette(), SuggestionFocus::default());
        assert_eq!(card.calculate_height(80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_highlighted_suggestion_marked() {
        let entry = assistant(json!({"follow_up_suggestions": ["Tell me more", "Compare"]}));
        let focus = SuggestionFocus {
            active: true,
            highlighted: Some(1),
        };
        let text = draw_entry(&entry, focus, 80);
        assert!(text.contains("▶ [2] Compare"));
        assert!(text.contains("[1] Tell me more"));
        assert!(text.contains("Tab to select"));
    }

    #[test]
    fn test_inactive_suggestions_have_no_hint() {
        let entry = assistant(json!({"follow_up_suggestions": ["Tell me more"]}));
        let text = draw_entry(&entry, SuggestionFocus::default(), 80);
        assert!(text.contains("[1] Tell me more"));
        assert!(!text.contains("Tab to select"));
    }

    #[test]
    fn test_oversized_card_height_saturates() {
        // One wrapped line per row; far more rows than a u16 can count.
        let rows: Vec<_> = (0..70_000).map(|i| json!({"n": i})).collect();
        let entry = assistant(json!({"table": rows}));
        let sections = entry_sections(&entry);
        let card = EntryCard::new(&entry, &sections, palette(), SuggestionFocus::default());
        assert_eq!(card.calculate_height(80), u16::MAX);
    }

    #[test]
    fn test_card_uses_given_sections() {
        let entry = assistant(json!({"points": {"a": {"text": "from payload"}}}));
        let sections = vec![Section::KeyPoints(vec!["precomputed".into()])];
        let text = draw(
            EntryCard::new(&entry, &sections, palette(), SuggestionFocus::default()),
            80,
        );
        assert!(text.contains("• precomputed"));
        assert!(!text.contains("from payload"));
    }
}
