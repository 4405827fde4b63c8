/// All semantic actions the board and form understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusLeft,
    FocusRight,
    SelectUp,
    SelectDown,

    // Task lifecycle
    CreateNew,
    EditSelected,
    DeleteSelected,
    AdvanceSelected,
    RetreatSelected,

    // Form
    Confirm,
    Cancel,
    InputChar(char),
    InputBackspace,
    InputDeleteWord,
    InputLeft,
    InputRight,
    InputHome,
    InputEnd,

    // Board
    ToggleHelp,
    Resize,
    Quit,

    // No-op
    None,
}
