//! # TitleBar Component
//!
//! One-line status bar: application name, backend address, current status
//! and theme. Purely presentational; every field is a prop.
//!
//! ```text
//! TrustSight | http://localhost:8000 | Researching… | theme: dark
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::core::theme::Theme;
use crate::tui::component::Component;
use crate::tui::palette::Palette;

pub const BUSY_STATUS: &str = "Researching…";
pub const IDLE_STATUS: &str = "Ready";

pub struct TitleBar {
    pub backend: String,
    pub busy: bool,
    pub theme: Theme,
    pub palette: Palette,
}

impl TitleBar {
    pub fn new(backend: String, busy: bool, theme: Theme, palette: Palette) -> Self {
        Self {
            backend,
            busy,
            theme,
            palette,
        }
    }

    pub fn status(&self) -> &'static str {
        if self.busy { BUSY_STATUS } else { IDLE_STATUS }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let p = self.palette;
        let status_style = if self.busy {
            p.title()
        } else {
            p.dim()
        };
        let line = Line::from(vec![
            Span::styled("TrustSight", p.title().add_modifier(Modifier::BOLD)),
            Span::styled(format!(" | {} | ", self.backend), p.dim()),
            Span::styled(self.status(), status_style),
            Span::styled(format!(" | theme: {}", self.theme.label()), p.dim()),
        ]);
        frame.render_widget(line, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(mut bar: TitleBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                bar.render(f, area);
            })
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
    fn test_busy_status_shown() {
        let text = draw(TitleBar::new(
            "http://localhost:8000".into(),
            true,
            Theme::Dark,
            Palette::for_theme(Theme::Dark),
        ));
        assert!(text.contains("TrustSight"));
        assert!(text.contains("http://localhost:8000"));
        assert!(text.contains(BUSY_STATUS));
        assert!(text.contains("theme: dark"));
    }

    #[test]
    fn test_idle_status_shown() {
        let text = draw(TitleBar::new(
            "http://backend".into(),
            false,
            Theme::Light,
            Palette::for_theme(Theme::Light),
        ));
        assert!(text.contains(IDLE_STATUS));
        assert!(!text.contains(BUSY_STATUS));
        assert!(text.contains("theme: light"));
    }
}
