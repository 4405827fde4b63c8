use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use crate::form::{Form, FormField, TextBuffer};

const TITLE_PLACEHOLDER: &str = "task name";
const DESCRIPTION_PLACEHOLDER: &str = "description";

/// Render the create/edit form as a centered popup over the board.
pub fn render_form(f: &mut Frame, area: Rect, form: &Form) {
    let popup_area = super::centered_rect(area, 60, 40, 40, 9);
    f.render_widget(Clear, popup_area);

    let heading = if form.is_edit() {
        format!(" Edit task in {} ", form.target().title())
    } else {
        format!(" New task in {} ", form.target().title())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::COLUMN_FOCUSED_BORDER))
        .title(Span::styled(
            heading,
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(1, 1, 1, 0));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    if inner.height < 5 {
        return;
    }

    let title_area = Rect::new(inner.x, inner.y, inner.width, 2);
    let desc_area = Rect::new(inner.x, inner.y + 3, inner.width, 2);

    let focused = form.field();
    render_field(f, title_area, "Title", &form.title, TITLE_PLACEHOLDER, focused == FormField::Title);
    render_field(
        f,
        desc_area,
        "Description",
        &form.description,
        DESCRIPTION_PLACEHOLDER,
        focused == FormField::Description,
    );
}

/// Label on the first row, input on the second. The focused field gets the
/// terminal cursor.
fn render_field(
    f: &mut Frame,
    area: Rect,
    label: &str,
    buf: &TextBuffer,
    placeholder: &str,
    is_focused: bool,
) {
    let label_style = if is_focused {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    } else {
        Theme::dim_style()
    };
    f.render_widget(
        Paragraph::new(Line::styled(label.to_string(), label_style)),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let prompt = "> ";
    let input_line = if buf.input.is_empty() {
        Line::from(vec![
            Span::raw(prompt),
            Span::styled(placeholder.to_string(), Theme::dim_style()),
        ])
    } else {
        Line::from(vec![Span::raw(prompt), Span::raw(buf.input.clone())])
    };

    // Keep the cursor in view on long input.
    let cursor_col = (prompt.width() + buf.before_cursor().width()) as u16;
    let scroll = cursor_col.saturating_sub(area.width.saturating_sub(1));
    let input_area = Rect::new(area.x, area.y + 1, area.width, 1);
    f.render_widget(Paragraph::new(input_line).scroll((0, scroll)), input_area);

    if is_focused {
        f.set_cursor_position(Position::new(input_area.x + cursor_col - scroll, input_area.y));
    }
}
