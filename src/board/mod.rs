pub mod column;
pub mod storage;

pub use column::Column;

use crate::form::Submission;

/// Workflow stage of a task. One column exists per status, in this order.
///
/// The ring is cyclic: `next` of the last stage is the first, `prev` of the
/// first is the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Self::Todo, Self::InProgress, Self::Done];

    pub fn next(self) -> Self {
        match self {
            Self::Todo => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::Todo,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Todo => Self::Done,
            Self::InProgress => Self::Todo,
            Self::Done => Self::InProgress,
        }
    }

    /// Position of this status's column on the board.
    pub fn index(self) -> usize {
        match self {
            Self::Todo => 0,
            Self::InProgress => 1,
            Self::Done => 2,
        }
    }

    /// Name used in the task file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Column header text.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" | "to do" | "to_do" => Ok(Self::Todo),
            "in_progress" | "in progress" | "in-progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(format!("unknown status '{other}': use todo, in_progress, done")),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single task on the board.
///
/// `status` mirrors the column holding the task; the board restamps it on
/// every insert or move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub status: Status,
    pub title: String,
    pub description: String,
}

impl Task {
    pub fn new(status: Status, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Where a submitted task lands in its column: at the end (create) or over an
/// existing position (edit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Append,
    Replace(usize),
}

/// The board: one column per status plus the focus cursor.
#[derive(Debug, Clone)]
pub struct Board {
    columns: Vec<Column>,
    focused: Status,
    loaded: bool,
    quitting: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board with focus on the first column.
    pub fn new() -> Self {
        let mut columns: Vec<Column> = Status::ALL.iter().map(|s| Column::new(*s)).collect();
        columns[Status::Todo.index()].focus();
        Self {
            columns,
            focused: Status::Todo,
            loaded: false,
            quitting: false,
        }
    }

    /// Build a board from stored tasks, keeping their order within each column.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut board = Self::new();
        for task in tasks {
            let status = task.status;
            board.columns[status.index()].insert_or_replace(Slot::Append, task);
        }
        board
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, status: Status) -> &Column {
        &self.columns[status.index()]
    }

    pub fn focused(&self) -> Status {
        self.focused
    }

    pub fn focused_column(&self) -> &Column {
        self.column(self.focused)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.focused_column().selected_task()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Called once the terminal size is known.
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn quit(&mut self) {
        self.quitting = true;
    }

    /// All tasks grouped by column in status order.
    pub fn tasks(&self) -> Vec<Task> {
        self.columns
            .iter()
            .flat_map(|col| col.tasks().iter().cloned())
            .collect()
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    // -----------------------------------------------------------------------
    // Focus movement
    // -----------------------------------------------------------------------

    pub fn focus_prev(&mut self) {
        self.move_focus(self.focused.prev());
    }

    pub fn focus_next(&mut self) {
        self.move_focus(self.focused.next());
    }

    fn move_focus(&mut self, to: Status) {
        self.columns[self.focused.index()].blur();
        self.focused = to;
        self.columns[to.index()].focus();
    }

    pub fn select_prev(&mut self) {
        self.focused_column_mut().select(-1);
    }

    pub fn select_next(&mut self) {
        self.focused_column_mut().select(1);
    }

    fn focused_column_mut(&mut self) -> &mut Column {
        &mut self.columns[self.focused.index()]
    }

    // -----------------------------------------------------------------------
    // Task lifecycle
    // -----------------------------------------------------------------------

    /// Write a finished form into its target column.
    pub fn apply(&mut self, submission: Submission) -> bool {
        let Submission { status, slot, mut task } = submission;
        task.status = status;
        let applied = self.columns[status.index()].insert_or_replace(slot, task);
        debug_assert!(self.is_consistent());
        applied
    }

    /// Drop the selected task of the focused column. `None` when it is empty.
    pub fn delete_selected(&mut self) -> Option<Task> {
        let removed = self.focused_column_mut().remove_selected();
        debug_assert!(self.is_consistent());
        removed
    }

    /// Move the selected task to the next status's column, wrapping at the end.
    /// Returns the status it landed in.
    pub fn advance_selected(&mut self) -> Option<Status> {
        self.move_selected(self.focused.next())
    }

    /// Move the selected task to the previous status's column.
    pub fn retreat_selected(&mut self) -> Option<Status> {
        self.move_selected(self.focused.prev())
    }

    fn move_selected(&mut self, to: Status) -> Option<Status> {
        let mut task = self.focused_column_mut().remove_selected()?;
        task.status = to;
        self.columns[to.index()].insert_or_replace(Slot::Append, task);
        debug_assert!(self.is_consistent());
        Some(to)
    }

    /// Every task's status matches its column, exactly the focused column is
    /// focused, and each non-empty column has an in-range selection.
    pub fn is_consistent(&self) -> bool {
        let focus_ok = self
            .columns
            .iter()
            .all(|col| col.is_focused() == (col.status() == self.focused));
        let order_ok = self
            .columns
            .iter()
            .zip(Status::ALL)
            .all(|(col, status)| col.status() == status);
        let tasks_ok = self
            .columns
            .iter()
            .all(|col| col.tasks().iter().all(|t| t.status == col.status()));
        let selection_ok = self.columns.iter().all(|col| match col.selected_index() {
            Some(idx) => idx < col.len(),
            None => col.is_empty(),
        });
        focus_ok && order_ok && tasks_ok && selection_ok
    }
}
