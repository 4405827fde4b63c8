use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action::Action;
use crate::app::Mode;

/// Map a key event to a semantic action based on current mode.
///
/// The board and the form never see each other's keys: in the form every
/// printable key is text, so only Ctrl-C quits from there.
pub fn map_key(key: KeyEvent, mode: &Mode) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    match mode {
        Mode::Board => map_board(key),
        Mode::Form(_) => map_form(key),
    }
}

fn map_board(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Action::FocusLeft,
        KeyCode::Char('l') | KeyCode::Right => Action::FocusRight,
        KeyCode::Char('k') | KeyCode::Up => Action::SelectUp,
        KeyCode::Char('j') | KeyCode::Down => Action::SelectDown,
        KeyCode::Char('n') => Action::CreateNew,
        KeyCode::Char('e') => Action::EditSelected,
        KeyCode::Char('d') => Action::DeleteSelected,
        KeyCode::Enter | KeyCode::Char('L') => Action::AdvanceSelected,
        KeyCode::Char('H') => Action::RetreatSelected,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

fn map_form(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputHome,
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::InputEnd,
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::InputDeleteWord
        }
        KeyCode::Char(c) => Action::InputChar(c),
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Left => Action::InputLeft,
        KeyCode::Right => Action::InputRight,
        KeyCode::Home => Action::InputHome,
        KeyCode::End => Action::InputEnd,
        _ => Action::None,
    }
}

// ---------------------------------------------------------------------------
// Binding registry, shown in the help footer.
// ---------------------------------------------------------------------------

/// A documented keybinding for display in the help footer.
pub struct Binding {
    pub key: &'static str,
    pub description: &'static str,
}

pub const BOARD_BINDINGS: &[Binding] = &[
    Binding { key: "n", description: "new task" },
    Binding { key: "e", description: "edit task" },
    Binding { key: "d", description: "delete task" },
    Binding { key: "enter", description: "move to next column" },
    Binding { key: "H", description: "move to previous column" },
    Binding { key: "←/h →/l", description: "switch column" },
    Binding { key: "↑/k ↓/j", description: "select task" },
    Binding { key: "?", description: "toggle help" },
    Binding { key: "q/ctrl+c", description: "quit" },
];

pub const FORM_BINDINGS: &[Binding] = &[
    Binding { key: "enter", description: "next field / save" },
    Binding { key: "esc", description: "cancel" },
    Binding { key: "ctrl+w", description: "delete word" },
    Binding { key: "ctrl+c", description: "quit" },
];

/// Bindings relevant in `mode`.
pub fn mode_bindings(mode: &Mode) -> &'static [Binding] {
    match mode {
        Mode::Board => BOARD_BINDINGS,
        Mode::Form(_) => FORM_BINDINGS,
    }
}
