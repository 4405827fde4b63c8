use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;

use crate::board::storage::{StorageError, TaskStore};
use crate::board::{Board, Slot};
use crate::form::{Form, FormOutcome};
use crate::input::action::Action;
use crate::input::keymap::map_key;

/// Which sub-model receives input.
#[derive(Debug, Clone)]
pub enum Mode {
    Board,
    Form(Form),
}

/// Notification severity for statusbar coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Controller state that is not part of the board itself.
pub struct AppState {
    pub mode: Mode,
    pub show_help: bool,
    pub notification: Option<String>,
    pub notification_level: NotificationLevel,
    pub notification_expires: Option<Instant>,
    /// The last write to the store failed; the board holds unsaved changes.
    pub persist_pending: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Board,
            show_help: false,
            notification: None,
            notification_level: NotificationLevel::Info,
            notification_expires: None,
            persist_pending: false,
        }
    }

    pub fn form(&self) -> Option<&Form> {
        match &self.mode {
            Mode::Form(form) => Some(form),
            Mode::Board => None,
        }
    }

    /// Show a transient notification.
    pub fn notify(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Info;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Show a transient error notification (rendered in red).
    pub fn notify_error(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Error;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(5));
    }

    /// Clear expired notifications.
    pub fn tick_notification(&mut self) {
        if let Some(expires) = self.notification_expires {
            if Instant::now() >= expires {
                self.notification = None;
                self.notification_level = NotificationLevel::Info;
                self.notification_expires = None;
            }
        }
    }
}

/// Main TUI application loop.
///
/// Returns the store error if unsaved changes could not be written on the way
/// out; the caller reports it after the terminal is restored.
pub fn run(
    terminal: &mut DefaultTerminal,
    board: &mut Board,
    store: &mut dyn TaskStore,
) -> color_eyre::Result<Option<StorageError>> {
    let mut state = AppState::new();

    // The terminal already has a size by the time we draw.
    process_action(board, &mut state, Action::Resize, store);

    loop {
        state.tick_notification();

        terminal.draw(|f| crate::ui::render(f, board, &state))?;

        if event::poll(Duration::from_millis(250))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key, &state.mode),
                Event::Resize(_, _) => Action::Resize,
                _ => Action::None,
            };
            process_action(board, &mut state, action, store);

            if board.is_quitting() {
                break;
            }
        }
    }

    // Clear the screen before leaving.
    terminal.draw(|f| crate::ui::render(f, board, &state))?;

    Ok(flush(board, &mut state, store).err())
}

/// Route one action to the active sub-model and reconcile the result.
pub fn process_action(
    board: &mut Board,
    state: &mut AppState,
    action: Action,
    store: &mut dyn TaskStore,
) {
    match action {
        Action::None => {}
        Action::Resize => board.mark_loaded(),
        Action::Quit => {
            if matches!(state.mode, Mode::Form(_)) {
                tracing::debug!("discarding open form on quit");
            }
            state.mode = Mode::Board;
            board.quit();
        }
        _ => match state.mode {
            Mode::Board => handle_board_action(board, state, action, store),
            Mode::Form(_) => handle_form_action(board, state, action, store),
        },
    }
}

/// Retry the last failed write, if any. Called once on shutdown.
pub fn flush(
    board: &Board,
    state: &mut AppState,
    store: &mut dyn TaskStore,
) -> Result<(), StorageError> {
    if !state.persist_pending {
        return Ok(());
    }
    tracing::info!("flushing unsaved changes");
    match store.persist(&board.tasks()) {
        Ok(()) => {
            state.persist_pending = false;
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "final save failed");
            Err(e)
        }
    }
}

// ---------------------------------------------------------------------------
// Handler: board view
// ---------------------------------------------------------------------------

fn handle_board_action(
    board: &mut Board,
    state: &mut AppState,
    action: Action,
    store: &mut dyn TaskStore,
) {
    match action {
        Action::FocusLeft => board.focus_prev(),
        Action::FocusRight => board.focus_next(),
        Action::SelectUp => board.select_prev(),
        Action::SelectDown => board.select_next(),
        Action::ToggleHelp => state.show_help = !state.show_help,
        Action::CreateNew => {
            tracing::debug!(column = %board.focused(), "opening create form");
            state.mode = Mode::Form(Form::create(board.focused()));
        }
        Action::EditSelected => {
            let col = board.focused_column();
            if let (Some(idx), Some(task)) = (col.selected_index(), col.selected_task()) {
                tracing::debug!(column = %col.status(), idx, "opening edit form");
                state.mode = Mode::Form(Form::edit(col.status(), idx, task));
            }
        }
        Action::DeleteSelected => {
            if let Some(task) = board.delete_selected() {
                tracing::info!(title = %task.title, column = %task.status, "deleted task");
                commit(board, state, store, "Task deleted");
            }
        }
        Action::AdvanceSelected => {
            if let Some(to) = board.advance_selected() {
                tracing::info!(to = %to, "advanced task");
                commit(board, state, store, format!("Moved to {}", to.title()));
            }
        }
        Action::RetreatSelected => {
            if let Some(to) = board.retreat_selected() {
                tracing::info!(to = %to, "moved task back");
                commit(board, state, store, format!("Moved to {}", to.title()));
            }
        }
        // Form-only actions arriving in board view do nothing.
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Handler: form editing
// ---------------------------------------------------------------------------

fn handle_form_action(
    board: &mut Board,
    state: &mut AppState,
    action: Action,
    store: &mut dyn TaskStore,
) {
    let Mode::Form(form) = &mut state.mode else {
        return;
    };
    match form.handle(action) {
        FormOutcome::Pending => {}
        FormOutcome::Aborted => {
            tracing::debug!("form cancelled");
            state.mode = Mode::Board;
        }
        FormOutcome::Submitted(submission) => {
            state.mode = Mode::Board;
            let verb = if matches!(submission.slot, Slot::Replace(_)) { "updated" } else { "created" };
            tracing::info!(title = %submission.task.title, column = %submission.status, "{verb} task");
            if board.apply(submission) {
                commit(board, state, store, format!("Task {verb}"));
            }
        }
    }
}

/// Persist the whole board after a mutation. A failed write keeps the
/// mutation and marks it pending for the next write or shutdown.
fn commit(board: &Board, state: &mut AppState, store: &mut dyn TaskStore, msg: impl Into<String>) {
    match store.persist(&board.tasks()) {
        Ok(()) => {
            state.persist_pending = false;
            state.notify(msg);
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to save tasks");
            state.persist_pending = true;
            state.notify_error(format!("Save failed: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Status, Task};

    /// Records every write; fails while `fail` is set.
    #[derive(Default)]
    struct RecordingStore {
        writes: Vec<Vec<Task>>,
        fail: bool,
    }

    impl TaskStore for RecordingStore {
        fn load(&self) -> Result<Vec<Task>, StorageError> {
            Ok(self.writes.last().cloned().unwrap_or_default())
        }

        fn persist(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
            if self.fail {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            self.writes.push(tasks.to_vec());
            Ok(())
        }
    }

    fn send(board: &mut Board, state: &mut AppState, store: &mut RecordingStore, actions: &[Action]) {
        for action in actions {
            process_action(board, state, action.clone(), store);
            assert!(board.is_consistent());
        }
    }

    fn type_str(board: &mut Board, state: &mut AppState, store: &mut RecordingStore, s: &str) {
        let actions: Vec<Action> = s.chars().map(Action::InputChar).collect();
        send(board, state, store, &actions);
    }

    fn clear_title(board: &mut Board, state: &mut AppState, store: &mut RecordingStore) {
        send(board, state, store, &[Action::InputEnd]);
        let len = state.form().map(|f| f.title.input.chars().count()).unwrap_or(0);
        send(board, state, store, &vec![Action::InputBackspace; len]);
    }

    #[test]
    fn test_create_task_through_form() {
        let mut board = Board::new();
        let mut state = AppState::new();
        let mut store = RecordingStore::default();

        send(&mut board, &mut state, &mut store, &[Action::CreateNew]);
        assert!(matches!(state.mode, Mode::Form(_)));
        type_str(&mut board, &mut state, &mut store, "buy milk");
        send(&mut board, &mut state, &mut store, &[Action::Confirm]);
        assert!(matches!(state.mode, Mode::Form(_)));
        assert!(store.writes.is_empty());
        type_str(&mut board, &mut state, &mut store, "2%");
        send(&mut board, &mut state, &mut store, &[Action::Confirm]);

        assert!(matches!(state.mode, Mode::Board));
        let expected = vec![Task::new(Status::Todo, "buy milk", "2%")];
        assert_eq!(board.column(Status::Todo).tasks(), expected.as_slice());
        assert_eq!(store.writes, vec![expected]);
        assert_eq!(state.notification.as_deref(), Some("Task created"));
    }

    #[test]
    fn test_edit_task_through_form() {
        let mut board = Board::from_tasks(vec![Task::new(Status::Todo, "a", "b")]);
        let mut state = AppState::new();
        let mut store = RecordingStore::default();

        send(&mut board, &mut state, &mut store, &[Action::EditSelected]);
        let form = state.form().unwrap();
        assert!(form.is_edit());
        assert_eq!(form.title.input, "a");
        clear_title(&mut board, &mut state, &mut store);
        type_str(&mut board, &mut state, &mut store, "c");
        send(&mut board, &mut state, &mut store, &[Action::Confirm, Action::Confirm]);

        assert_eq!(
            board.column(Status::Todo).tasks(),
            &[Task::new(Status::Todo, "c", "b")]
        );
        assert_eq!(store.writes.len(), 1);
        assert_eq!(state.notification.as_deref(), Some("Task updated"));
    }

    #[test]
    fn test_edit_on_empty_column_stays_on_board() {
        let mut board = Board::new();
        let mut state = AppState::new();
        let mut store = RecordingStore::default();
        send(&mut board, &mut state, &mut store, &[Action::EditSelected]);
        assert!(matches!(state.mode, Mode::Board));
    }

    #[test]
    fn test_abort_leaves_board_untouched() {
        let mut board = Board::from_tasks(vec![
            Task::new(Status::Todo, "a", "b"),
            Task::new(Status::Done, "c", "d"),
        ]);
        let before = board.tasks();
        let mut state = AppState::new();
        let mut store = RecordingStore::default();

        send(&mut board, &mut state, &mut store, &[Action::CreateNew]);
        type_str(&mut board, &mut state, &mut store, "draft");
        send(&mut board, &mut state, &mut store, &[Action::Cancel]);
        assert!(matches!(state.mode, Mode::Board));

        send(&mut board, &mut state, &mut store, &[Action::EditSelected]);
        type_str(&mut board, &mut state, &mut store, "zzz");
        send(&mut board, &mut state, &mut store, &[Action::Confirm, Action::Cancel]);
        assert!(matches!(state.mode, Mode::Board));

        assert_eq!(board.tasks(), before);
        assert_eq!(board.focused(), Status::Todo);
        assert!(store.writes.is_empty());
    }

    #[test]
    fn test_board_keys_are_inert_inside_form() {
        let mut board = Board::from_tasks(vec![Task::new(Status::Todo, "a", "")]);
        let mut state = AppState::new();
        let mut store = RecordingStore::default();
        send(
            &mut board,
            &mut state,
            &mut store,
            &[Action::CreateNew, Action::DeleteSelected, Action::AdvanceSelected, Action::FocusRight],
        );
        assert_eq!(board.column(Status::Todo).len(), 1);
        assert_eq!(board.focused(), Status::Todo);
        assert!(store.writes.is_empty());
    }

    #[test]
    fn test_delete_on_empty_column_is_silent() {
        let mut board = Board::new();
        let mut state = AppState::new();
        let mut store = RecordingStore::default();
        send(&mut board, &mut state, &mut store, &[Action::DeleteSelected, Action::AdvanceSelected]);
        assert!(store.writes.is_empty());
        assert!(state.notification.is_none());
    }

    #[test]
    fn test_every_mutation_persisted_once_in_order() {
        let mut board = Board::from_tasks(vec![
            Task::new(Status::Todo, "a", ""),
            Task::new(Status::Todo, "b", ""),
        ]);
        let mut state = AppState::new();
        let mut store = RecordingStore::default();

        let mut snapshots = Vec::new();
        for action in [
            Action::AdvanceSelected,
            Action::FocusRight,
            Action::AdvanceSelected,
            Action::FocusLeft,
            Action::DeleteSelected,
            Action::RetreatSelected,
        ] {
            let writes_before = store.writes.len();
            process_action(&mut board, &mut state, action, &mut store);
            if store.writes.len() > writes_before {
                snapshots.push(board.tasks());
            }
        }

        assert_eq!(store.writes, snapshots);
        assert_eq!(store.writes.len(), 3);
        assert_eq!(store.writes.last().unwrap(), &board.tasks());
        assert_eq!(board.column(Status::Done).tasks()[0].title, "a");
    }

    #[test]
    fn test_failed_persist_keeps_mutation_and_retries() {
        let mut board = Board::from_tasks(vec![
            Task::new(Status::Todo, "a", ""),
            Task::new(Status::Todo, "b", ""),
        ]);
        let mut state = AppState::new();
        let mut store = RecordingStore { fail: true, ..Default::default() };

        send(&mut board, &mut state, &mut store, &[Action::DeleteSelected]);
        assert_eq!(board.column(Status::Todo).len(), 1);
        assert!(state.persist_pending);
        assert_eq!(state.notification_level, NotificationLevel::Error);

        store.fail = false;
        send(&mut board, &mut state, &mut store, &[Action::AdvanceSelected]);
        assert!(!state.persist_pending);
        assert_eq!(store.writes, vec![board.tasks()]);
    }

    #[test]
    fn test_flush_on_quit_writes_pending_state() {
        let mut board = Board::from_tasks(vec![Task::new(Status::Todo, "a", "")]);
        let mut state = AppState::new();
        let mut store = RecordingStore { fail: true, ..Default::default() };

        send(&mut board, &mut state, &mut store, &[Action::AdvanceSelected, Action::Quit]);
        assert!(board.is_quitting());
        assert!(flush(&board, &mut state, &mut store).is_err());
        assert!(state.persist_pending);

        store.fail = false;
        flush(&board, &mut state, &mut store).unwrap();
        assert!(!state.persist_pending);
        assert_eq!(store.writes, vec![board.tasks()]);

        // nothing pending: no extra write
        flush(&board, &mut state, &mut store).unwrap();
        assert_eq!(store.writes.len(), 1);
    }

    #[test]
    fn test_quit_from_form_discards_it() {
        let mut board = Board::new();
        let mut state = AppState::new();
        let mut store = RecordingStore::default();
        send(&mut board, &mut state, &mut store, &[Action::CreateNew]);
        type_str(&mut board, &mut state, &mut store, "half");
        send(&mut board, &mut state, &mut store, &[Action::Quit]);
        assert!(board.is_quitting());
        assert!(matches!(state.mode, Mode::Board));
        assert_eq!(board.task_count(), 0);
        assert!(store.writes.is_empty());
    }

    #[test]
    fn test_resize_only_marks_loaded() {
        let mut board = Board::from_tasks(vec![Task::new(Status::Todo, "a", "")]);
        let before = board.tasks();
        let mut state = AppState::new();
        let mut store = RecordingStore::default();
        send(&mut board, &mut state, &mut store, &[Action::CreateNew]);
        type_str(&mut board, &mut state, &mut store, "x");
        send(&mut board, &mut state, &mut store, &[Action::Resize]);
        assert!(board.is_loaded());
        assert_eq!(state.form().unwrap().title.input, "x");
        assert_eq!(board.tasks(), before);
        assert!(store.writes.is_empty());
    }

    #[test]
    fn test_create_targets_focused_column() {
        let mut board = Board::new();
        let mut state = AppState::new();
        let mut store = RecordingStore::default();
        send(&mut board, &mut state, &mut store, &[Action::FocusLeft, Action::CreateNew]);
        type_str(&mut board, &mut state, &mut store, "ship it");
        send(&mut board, &mut state, &mut store, &[Action::Confirm, Action::Confirm]);
        assert_eq!(
            board.column(Status::Done).tasks(),
            &[Task::new(Status::Done, "ship it", "")]
        );
    }

    #[test]
    fn test_toggle_help() {
        let mut board = Board::new();
        let mut state = AppState::new();
        let mut store = RecordingStore::default();
        send(&mut board, &mut state, &mut store, &[Action::ToggleHelp]);
        assert!(state.show_help);
        send(&mut board, &mut state, &mut store, &[Action::ToggleHelp]);
        assert!(!state.show_help);
    }
}
