use crate::board::{Slot, Status, Task};
use crate::input::action::Action;

/// Reusable text editing buffer with cursor.
///
/// `cursor` is a **char index** (not byte index), always in `0..=char_count`.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    pub input: String,
    pub cursor: usize,
}

impl TextBuffer {
    pub fn new(input: String) -> Self {
        let cursor = input.chars().count();
        Self { input, cursor }
    }

    /// Convert a char index to a byte index.
    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert(&mut self, c: char) {
        let byte_idx = self.byte_offset(self.cursor);
        self.input.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let byte_idx = self.byte_offset(self.cursor - 1);
            self.input.remove(byte_idx);
            self.cursor -= 1;
        }
    }

    /// Delete back to the start of the word before the cursor.
    pub fn delete_word(&mut self) {
        let byte_pos = self.byte_offset(self.cursor);
        let trimmed = self.input[..byte_pos].trim_end();
        let start_byte = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let start_char = self.input[..start_byte].chars().count();
        self.input.drain(start_byte..byte_pos);
        self.cursor = start_char;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Text before the cursor, for cursor placement when rendering.
    pub fn before_cursor(&self) -> &str {
        &self.input[..self.byte_offset(self.cursor)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
}

/// A finished form: the task to write and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub status: Status,
    pub slot: Slot,
    pub task: Task,
}

/// What the controller should do after feeding the form an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Pending,
    Submitted(Submission),
    Aborted,
}

/// Transient create/edit editor.
///
/// It only remembers which column and slot it targets; applying the result is
/// up to the board.
#[derive(Debug, Clone)]
pub struct Form {
    pub title: TextBuffer,
    pub description: TextBuffer,
    target: Status,
    slot: Slot,
    field: FormField,
}

impl Form {
    /// Blank form appending to `target`.
    pub fn create(target: Status) -> Self {
        Self {
            title: TextBuffer::default(),
            description: TextBuffer::default(),
            target,
            slot: Slot::Append,
            field: FormField::Title,
        }
    }

    /// Form prefilled from `task`, replacing position `index` of `target`.
    pub fn edit(target: Status, index: usize, task: &Task) -> Self {
        Self {
            title: TextBuffer::new(task.title.clone()),
            description: TextBuffer::new(task.description.clone()),
            target,
            slot: Slot::Replace(index),
            field: FormField::Title,
        }
    }

    pub fn target(&self) -> Status {
        self.target
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn field(&self) -> FormField {
        self.field
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.slot, Slot::Replace(_))
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = TextBuffer::new(title.into());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = TextBuffer::new(description.into());
    }

    /// Feed one action to the form.
    pub fn handle(&mut self, action: Action) -> FormOutcome {
        match action {
            Action::Confirm => match self.field {
                FormField::Title => {
                    self.field = FormField::Description;
                    FormOutcome::Pending
                }
                FormField::Description => FormOutcome::Submitted(self.clone().into_submission()),
            },
            Action::Cancel => FormOutcome::Aborted,
            Action::InputChar(c) => {
                self.focused_buffer().insert(c);
                FormOutcome::Pending
            }
            Action::InputBackspace => {
                self.focused_buffer().backspace();
                FormOutcome::Pending
            }
            Action::InputDeleteWord => {
                self.focused_buffer().delete_word();
                FormOutcome::Pending
            }
            Action::InputLeft => {
                self.focused_buffer().move_left();
                FormOutcome::Pending
            }
            Action::InputRight => {
                self.focused_buffer().move_right();
                FormOutcome::Pending
            }
            Action::InputHome => {
                self.focused_buffer().home();
                FormOutcome::Pending
            }
            Action::InputEnd => {
                self.focused_buffer().end();
                FormOutcome::Pending
            }
            _ => FormOutcome::Pending,
        }
    }

    /// Build the task from the captured text, tagged with target and slot.
    pub fn into_submission(self) -> Submission {
        Submission {
            status: self.target,
            slot: self.slot,
            task: Task::new(self.target, self.title.input, self.description.input),
        }
    }

    fn focused_buffer(&mut self) -> &mut TextBuffer {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }
}
