use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::app::{AppState, Mode, NotificationLevel};
use crate::board::Board;

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState, board: &Board) {
    let left = build_left_zone(state);
    let right = build_right_zone(state, board);

    let left_width: usize = left.iter().map(|s| s.content.width()).sum();
    let right_width: usize = right.iter().map(|s| s.content.width()).sum();
    let center_avail = (area.width as usize).saturating_sub(left_width + right_width);
    let center = build_center_zone(state, center_avail);

    let mut spans = left;
    spans.extend(center);
    spans.extend(right);

    f.render_widget(Paragraph::new(Line::from(spans)).style(Theme::status_style()), area);
}

/// Mode badge.
fn build_left_zone(state: &AppState) -> Vec<Span<'static>> {
    let mode_str = match &state.mode {
        Mode::Board => "BOARD",
        Mode::Form(form) if form.is_edit() => "EDIT",
        Mode::Form(_) => "NEW",
    };
    vec![
        Span::styled(
            format!(" {mode_str} "),
            Style::default()
                .fg(Theme::FG)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw(" "),
    ]
}

/// Notification, padded to fill the space between the outer zones.
fn build_center_zone(state: &AppState, width: usize) -> Vec<Span<'static>> {
    let Some(msg) = &state.notification else {
        return vec![Span::raw(" ".repeat(width))];
    };
    let color = match state.notification_level {
        NotificationLevel::Info => Theme::FG,
        NotificationLevel::Error => Theme::STATUS_ERROR,
    };
    let text = super::board_view::truncate(msg, width);
    let pad = width.saturating_sub(text.width());
    vec![
        Span::styled(text, Style::default().fg(color)),
        Span::raw(" ".repeat(pad)),
    ]
}

/// Unsaved marker, focused column and selection position, help hint.
fn build_right_zone(state: &AppState, board: &Board) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    if state.persist_pending {
        spans.push(Span::styled(
            "[unsaved] ",
            Style::default().fg(Theme::STATUS_UNSAVED).add_modifier(Modifier::BOLD),
        ));
    }

    let col = board.focused_column();
    let pos = match col.selected_index() {
        Some(idx) => format!(" {}/{}", idx + 1, col.len()),
        None => " 0".to_string(),
    };
    spans.push(Span::styled(col.title().to_string(), Theme::dim_style()));
    spans.push(Span::styled(pos, Style::default().fg(Theme::FG)));

    if !state.show_help {
        spans.push(Span::styled("  ? help ", Theme::dim_style()));
    } else {
        spans.push(Span::raw(" "));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Status, Task};

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_right_zone_shows_position() {
        let mut board = Board::from_tasks(vec![
            Task::new(Status::Todo, "a", ""),
            Task::new(Status::Todo, "b", ""),
        ]);
        board.select_next();
        let state = AppState::new();
        assert_eq!(text(&build_right_zone(&state, &board)), "To Do 2/2  ? help ");
    }

    #[test]
    fn test_right_zone_flags_unsaved() {
        let board = Board::new();
        let mut state = AppState::new();
        state.persist_pending = true;
        state.show_help = true;
        assert_eq!(text(&build_right_zone(&state, &board)), "[unsaved] To Do 0 ");
    }

    #[test]
    fn test_center_zone_pads_notification() {
        let mut state = AppState::new();
        state.notify("Task created");
        let zone = build_center_zone(&state, 20);
        assert_eq!(text(&zone).width(), 20);
        assert!(text(&zone).starts_with("Task created"));
    }
}
