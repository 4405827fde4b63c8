pub mod board_view;
pub mod form_modal;
pub mod help;
pub mod status_bar;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::board::Board;

/// Create a centered rect within `area` using percentage-based sizing with minimums.
pub fn centered_rect(area: Rect, w_pct: u16, h_pct: u16, min_w: u16, min_h: u16) -> Rect {
    let width = (area.width * w_pct / 100).max(min_w).min(area.width);
    let height = (area.height * h_pct / 100).max(min_h).min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Draw the whole screen. Reads state only.
pub fn render(f: &mut Frame, board: &Board, state: &AppState) {
    if board.is_quitting() {
        return;
    }
    if !board.is_loaded() {
        f.render_widget(Paragraph::new("loading..."), f.area());
        return;
    }

    let footer_height = if state.show_help { help::footer_height(&state.mode) } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(footer_height),
            Constraint::Length(1),
        ])
        .split(f.area());

    board_view::render_board(f, chunks[0], board);

    if state.show_help {
        help::render_help_footer(f, chunks[1], &state.mode);
    }

    status_bar::render_status_bar(f, chunks[2], state, board);

    if let Mode::Form(form) = &state.mode {
        form_modal::render_form(f, chunks[0], form);
    }
}
