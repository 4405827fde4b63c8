use ratatui::style::{Color, Modifier, Style};

/// Color theme for the board.
///
/// Text and chrome use the terminal's default foreground; only focus,
/// selection and errors get color.
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::Reset;
    pub const DIM: Color = Color::DarkGray;

    // Column
    pub const COLUMN_FOCUSED_BORDER: Color = Color::Indexed(62);
    pub const COLUMN_BORDER: Color = Color::DarkGray;

    // Task
    pub const TASK_SELECTED: Color = Color::Indexed(170);
    pub const TASK_DESCRIPTION: Color = Color::Gray;

    // Status bar
    pub const STATUS_ERROR: Color = Color::Red;
    pub const STATUS_UNSAVED: Color = Color::Yellow;

    // Help footer
    pub const HINT_KEY: Color = Color::Reset;
    pub const HINT_DESC: Color = Color::DarkGray;

    pub fn dim_style() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn status_style() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn selected_style(column_focused: bool) -> Style {
        if column_focused {
            Style::default()
                .fg(Self::TASK_SELECTED)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::FG)
        }
    }
}
