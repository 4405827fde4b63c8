use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use super::theme::Theme;
use crate::app::Mode;
use crate::input::keymap;

/// Rows reserved for the help footer in `mode`.
pub fn footer_height(mode: &Mode) -> u16 {
    keymap::mode_bindings(mode).len().div_ceil(3) as u16
}

/// Render the key hints for the active mode, three per row.
pub fn render_help_footer(f: &mut Frame, area: Rect, mode: &Mode) {
    let key = Style::default().fg(Theme::HINT_KEY).add_modifier(Modifier::BOLD);
    let desc = Style::default().fg(Theme::HINT_DESC);

    let lines: Vec<Line> = keymap::mode_bindings(mode)
        .chunks(3)
        .map(|row| {
            let mut spans = Vec::new();
            for binding in row {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(binding.key, key));
                spans.push(Span::raw(" "));
                spans.push(Span::styled(format!("{:<24}", binding.description), desc));
            }
            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
