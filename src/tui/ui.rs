use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::Block;

use crate::core::state::Session;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::query_input;
use crate::tui::components::{TitleBar, Transcript, Welcome};

/// Lays out the screen: title bar, transcript (or welcome), query input.
pub fn draw_ui(
    frame: &mut Frame,
    session: &Session,
    tui: &mut TuiState,
    backend: &str,
    spinner_frame: usize,
) {
    use Constraint::{Length, Min};
    let palette = tui.palette();

    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let layout = Layout::vertical([Length(1), Min(0), Length(query_input::HEIGHT)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    TitleBar::new(backend.to_string(), session.busy, tui.theme, palette).render(frame, title_area);

    if session.transcript.is_empty() && !session.busy {
        Welcome::new(palette).render(frame, main_area);
    } else {
        Transcript {
            state: &mut tui.transcript,
            entries: &session.transcript,
            busy: session.busy,
            palette,
            selected_suggestion: tui.selected_suggestion,
            spinner_frame,
        }
        .render(frame, main_area);
    }

    tui.input.palette = palette;
    tui.input.disabled = session.busy;
    tui.input.render(frame, input_area);
}
