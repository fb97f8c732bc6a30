//! # Welcome Component
//!
//! Shown in place of the transcript while it is empty: a heading, a short
//! description, and the example prompts bound to F1/F2.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::palette::Palette;

pub const HEADING: &str = "Welcome to AI Research";
pub const DESCRIPTION: &str = "Ask a research question and get key points, data tables, \
    visualizations and related insights, each with suggested follow-ups.";

/// Prompts offered on the welcome screen, in F-key order.
pub const EXAMPLE_PROMPTS: [&str; 2] = [
    "What are the benefits of renewable energy?",
    "Compare programming languages in a table",
];

pub struct Welcome {
    pub palette: Palette,
}

impl Welcome {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let p = self.palette;
        let mut lines = vec![
            Line::styled(
                HEADING,
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            ),
            Line::default(),
            Line::styled(DESCRIPTION, Style::default().fg(p.text)),
            Line::default(),
            Line::styled("Try an example:", p.dim()),
        ];
        for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("F{} ", i + 1), p.title()),
                Span::styled(*prompt, Style::default().fg(p.user)),
            ]));
        }
        lines
    }
}

impl Component for Welcome {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.lines())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        let height = (paragraph.line_count(area.width) as u16).min(area.height);

        let [centered] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(paragraph, centered);
    }
}
