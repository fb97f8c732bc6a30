//! Colors for the light and dark themes.

use ratatui::style::{Color, Modifier, Style};

use crate::core::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub user: Color,
    pub assistant: Color,
    pub error: Color,
    pub highlight_bg: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Reset,
                text: Color::Gray,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                user: Color::Green,
                assistant: Color::Blue,
                error: Color::Red,
                highlight_bg: Color::Rgb(50, 60, 80),
            },
            Theme::Light => Self {
                background: Color::Rgb(250, 250, 250),
                text: Color::Rgb(30, 30, 30),
                muted: Color::Rgb(120, 120, 120),
                accent: Color::Rgb(0, 110, 160),
                user: Color::Rgb(20, 120, 60),
                assistant: Color::Rgb(40, 70, 170),
                error: Color::Rgb(180, 30, 30),
                highlight_bg: Color::Rgb(210, 225, 245),
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
