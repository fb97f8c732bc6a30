//! # Transcript Component
//!
//! Scrollable view of the session's exchange entries.
//!
//! `Transcript` is created each frame with props (entries, busy flag, the
//! live suggestion focus) and a `&mut TranscriptState` that persists scroll
//! position between frames. Whenever the number of entries changes the view
//! re-attaches to the bottom so the newest entry is visible.
//!
//! Assistant payloads are rendered into sections once per entry `seq` and
//! cached on the state; each frame measures and draws from the cache.

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::{ExchangeEntry, Role};
use crate::tui::component::{Component, EventHandler};
use crate::render::Section;
use crate::tui::components::entry_card::{EntryCard, SuggestionFocus, entry_sections};
use crate::tui::event::TuiEvent;
use crate::tui::palette::Palette;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Loading card: one text line plus borders.
pub const LOADING_HEIGHT: u16 = 3;

/// Scroll state for the transcript. Lives in the parent `TuiState`.
pub struct TranscriptState {
    pub scroll_state: ScrollViewState,
    /// When true, every render scrolls to the newest content.
    pub stick_to_bottom: bool,
    pub viewport_height: u16,
    /// Content height measured on the last render.
    pub content_height: u16,
    /// Entry count seen on the last render.
    last_len: usize,
    /// Rendered sections of each assistant entry, keyed by `seq`.
    section_cache: HashMap<u64, Vec<Section>>,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            viewport_height: 0,
            content_height: 0,
            last_len: 0,
            section_cache: HashMap::new(),
        }
    }

    /// Renders sections for assistant entries not seen before.
    fn cache_sections(&mut self, entries: &[ExchangeEntry]) {
        for entry in entries.iter().filter(|e| e.role == Role::Assistant) {
            self.section_cache
                .entry(entry.seq)
                .or_insert_with(|| entry_sections(entry));
        }
    }

    fn sections_for(&self, entry: &ExchangeEntry) -> &[Section] {
        match entry.role {
            Role::User => &[],
            Role::Assistant => self
                .section_cache
                .get(&entry.seq)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Keep the offset inside the content.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-attach to the bottom once the user scrolls all the way down.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Notes the current entry count; a change re-enables auto-scroll.
    fn observe_len(&mut self, len: usize) {
        if len != self.last_len {
            self.last_len = len;
            self.stick_to_bottom = true;
        }
    }
}

pub struct Transcript<'a> {
    pub state: &'a mut TranscriptState,
    pub entries: &'a [ExchangeEntry],
    pub busy: bool,
    pub palette: Palette,
    /// Highlighted follow-up on the latest assistant entry.
    pub selected_suggestion: Option<usize>,
    pub spinner_frame: usize,
}

impl<'a> Transcript<'a> {
    /// Index of the entry whose suggestions are live: the last assistant entry,
    /// and only while idle.
    fn live_index(&self) -> Option<usize> {
        if self.busy {
            return None;
        }
        self.entries
            .iter()
            .rposition(|e| e.role == Role::Assistant)
    }

    fn focus_for(&self, index: usize, live: Option<usize>) -> SuggestionFocus {
        if live == Some(index) {
            SuggestionFocus {
                active: true,
                highlighted: self.selected_suggestion,
            }
        } else {
            SuggestionFocus::default()
        }
    }

    fn card<'c>(
        &'c self,
        index: usize,
        entry: &'c ExchangeEntry,
        live: Option<usize>,
    ) -> EntryCard<'c> {
        let sections = self.state.sections_for(entry);
        EntryCard::new(entry, sections, self.palette, self.focus_for(index, live))
    }

    fn loading_card(&self) -> Paragraph<'static> {
        let p = self.palette;
        let frame = SPINNER[self.spinner_frame % SPINNER.len()];
        Paragraph::new(Line::styled(
            format!("{frame} Researching…"),
            Style::default().fg(p.accent),
        ))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(p.dim()),
        )
    }
}

impl<'a> Component for Transcript<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // -1 for the scrollbar
        let content_width = area.width.saturating_sub(1);
        let live = self.live_index();
        self.state.cache_sections(self.entries);

        let heights: Vec<u16> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| self.card(i, entry, live).calculate_height(content_width))
            .collect();
        let loading = if self.busy { LOADING_HEIGHT } else { 0 };
        let total_height = content_height(&heights, loading);

        self.state.observe_len(self.entries.len());
        self.state.viewport_height = area.height;
        self.state.content_height = total_height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y: u16 = 0;
        for (i, (entry, height)) in self.entries.iter().zip(&heights).enumerate() {
            let card = self.card(i, entry, live);
            scroll_view.render_widget(card, Rect::new(0, y, content_width, *height));
            y = y.saturating_add(*height);
        }
        if self.busy {
            scroll_view.render_widget(
                self.loading_card(),
                Rect::new(0, y, content_width, LOADING_HEIGHT),
            );
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Total height of the cards plus the loading card. Saturates at `u16::MAX`.
fn content_height(heights: &[u16], loading: u16) -> u16 {
    heights
        .iter()
        .fold(0u16, |acc, h| acc.saturating_add(*h))
        .saturating_add(loading)
}

/// Handled on the state because `Transcript` is rebuilt every frame.
impl EventHandler for TranscriptState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}
