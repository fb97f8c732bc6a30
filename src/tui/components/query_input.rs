//! # QueryInput Component
//!
//! Single-line query editor. The buffer mirrors `Session::draft`: edits are
//! reported as `InputEvent::Changed` so the parent can dispatch
//! `Action::DraftChanged`, and `sync()` pulls the draft back in after the
//! session clears it.
//!
//! While `disabled` (a request is in flight) edits and submission are ignored.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::palette::Palette;

pub const PLACEHOLDER: &str =
    "Ask anything... (e.g., 'What are the benefits of renewable energy?')";
pub const DISCLAIMER: &str = "TrustSight can make mistakes. Verify important information.";

/// Rows used by the input: one line of text plus borders.
pub const HEIGHT: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter with non-blank text.
    Submit(String),
    Changed,
}

pub struct QueryInput {
    pub buffer: String,
    /// Byte offset of the cursor in `buffer`.
    cursor: usize,
    /// Prop: true while the session is busy.
    pub disabled: bool,
    /// Prop: current colors.
    pub palette: Palette,
}

impl QueryInput {
    pub fn new(palette: Palette) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            disabled: false,
            palette,
        }
    }

    /// Replaces the buffer with `draft` if they differ, cursor at the end.
    pub fn sync(&mut self, draft: &str) {
        if self.buffer != draft {
            self.buffer = draft.to_string();
            self.cursor = self.buffer.len();
        }
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.buffer.len())
    }

    /// Horizontal scroll so the cursor stays visible in `width` columns.
    fn visible_window(&self, width: usize) -> (String, u16) {
        let before = &self.buffer[..self.cursor];
        let cursor_col = before.width();
        if cursor_col < width {
            return (self.buffer.clone(), cursor_col as u16);
        }

        // Drop leading chars until the cursor fits.
        let mut skip = 0;
        let mut dropped = 0;
        for c in before.chars() {
            if cursor_col - dropped < width {
                break;
            }
            dropped += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            skip += c.len_utf8();
        }
        (self.buffer[skip..].to_string(), (cursor_col - dropped) as u16)
    }
}

impl Component for QueryInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let palette = self.palette;
        let border_style = if self.disabled {
            palette.dim()
        } else {
            Style::default().fg(palette.user)
        };
        let title = if self.disabled { "Query (waiting…)" } else { "Query" };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_bottom(Line::from(DISCLAIMER).style(palette.dim()).right_aligned());
        let inner = block.inner(area);

        let (text, cursor_col) = self.visible_window(inner.width.saturating_sub(1) as usize);
        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(palette.dim())
        } else {
            Paragraph::new(text).style(palette.base().fg(palette.text))
        };

        frame.render_widget(paragraph.block(block), area);

        if !self.disabled && inner.width > 0 && inner.height > 0 {
            frame.set_cursor_position((inner.x + cursor_col, inner.y));
        }
    }
}

impl EventHandler for QueryInput {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                // Single-line input: newlines become spaces.
                let flat = text.replace(['\r', '\n'], " ");
                self.buffer.insert_str(self.cursor, &flat);
                self.cursor += flat.len();
                Some(InputEvent::Changed)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::Changed)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = self.next_boundary();
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::Changed)
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.prev_boundary();
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = self.next_boundary();
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = 0;
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer.len();
                None
            }
            TuiEvent::Submit if !self.buffer.trim().is_empty() => {
                Some(InputEvent::Submit(self.buffer.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn input() -> QueryInput {
        QueryInput::new(Palette::for_theme(Theme::Dark))
    }

    fn type_str(input: &mut QueryInput, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = input();
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::Changed)
        );
        type_str(&mut input, "bc");
        assert_eq!(input.buffer, "abc");

        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "ab");
    }

    #[test]
    fn test_cursor_editing_multibyte() {
        let mut input = input();
        type_str(&mut input, "héllo");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "hllo");
        input.handle_event(&TuiEvent::CursorEnd);
        input.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(input.buffer, "hllo!");
    }

    #[test]
    fn test_submit_does_not_clear_buffer() {
        // Clearing is the session's decision; the parent syncs afterwards.
        let mut input = input();
        type_str(&mut input, "hello");
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("hello".into()))
        );
        assert_eq!(input.buffer, "hello");
        input.sync("");
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn test_blank_submit_ignored() {
        let mut input = input();
        type_str(&mut input, "   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_disabled_ignores_everything() {
        let mut input = input();
        type_str(&mut input, "draft");
        input.disabled = true;
        assert_eq!(input.handle_event(&TuiEvent::InputChar('x')), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "draft");
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut input = input();
        input.handle_event(&TuiEvent::Paste("line one\nline two".into()));
        assert_eq!(input.buffer, "line one line two");
    }

    #[test]
    fn test_sync_moves_cursor_to_end() {
        let mut input = input();
        input.sync("What are the benefits of renewable energy?");
        input.handle_event(&TuiEvent::InputChar('!'));
        assert!(input.buffer.ends_with("?!"));
    }

    #[test]
    fn test_visible_window_scrolls_with_cursor() {
        let mut input = input();
        type_str(&mut input, "abcdefghij");
        let (text, col) = input.visible_window(5);
        assert!(text.ends_with('j'));
        assert!(col < 5);
    }

    #[test]
    fn test_render_shows_placeholder_and_disclaimer() {
        let backend = TestBackend::new(120, HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = input();

        terminal
            .draw(|f| {
                let area = f.area();
                input.render(f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Ask anything"));
        assert!(text.contains("Verify important information"));
    }
}
