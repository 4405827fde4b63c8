use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Padding, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;
use crate::board::{Board, Column};

const SELECTED_MARKER: &str = "│ ";

/// Cut `text` to at most `max_width` display columns, ending in `…` when cut.
/// Only the first line of multi-line text is kept.
pub(crate) fn truncate(text: &str, max_width: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.width() <= max_width && !text.contains('\n') {
        return first_line.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in first_line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub fn render_board(f: &mut Frame, area: Rect, board: &Board) {
    let columns = board.columns();
    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Ratio(1, columns.len() as u32))
        .collect();
    let col_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (col, col_area) in columns.iter().zip(col_areas.iter()) {
        render_column(f, *col_area, col);
    }
}

fn render_column(f: &mut Frame, area: Rect, col: &Column) {
    let is_focused = col.is_focused();
    let border_style = if is_focused {
        Style::default()
            .fg(Theme::COLUMN_FOCUSED_BORDER)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::COLUMN_BORDER)
    };

    let header = Line::from(vec![
        Span::styled(
            format!(" {} ", col.title()),
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("({}) ", col.len()), Theme::dim_style()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(header)
        .padding(Padding::new(1, 1, 1, 0));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if col.is_empty() {
        f.render_widget(Paragraph::new("No items.").style(Theme::dim_style()), inner);
        return;
    }

    let text_width = (inner.width as usize).saturating_sub(SELECTED_MARKER.width());
    let items: Vec<ListItem> = col
        .tasks()
        .iter()
        .map(|task| {
            let mut lines = vec![Line::from(truncate(&task.title, text_width))];
            lines.push(Line::styled(
                truncate(&task.description, text_width),
                Style::default().fg(Theme::TASK_DESCRIPTION),
            ));
            lines.push(Line::from(""));
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Theme::selected_style(is_focused))
        .highlight_symbol(SELECTED_MARKER);

    let mut list_state = ListState::default().with_selected(col.selected_index());
    f.render_stateful_widget(list, inner, &mut list_state);
}
