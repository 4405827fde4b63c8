use super::{Slot, Status, Task};

/// A single kanban column: one per [`Status`], holding its tasks in order.
#[derive(Debug, Clone)]
pub struct Column {
    status: Status,
    tasks: Vec<Task>,
    selected: usize,
    focused: bool,
}

impl Column {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            tasks: Vec::new(),
            selected: 0,
            focused: false,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn title(&self) -> &'static str {
        self.status.title()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Append (`Slot::Append`) or overwrite in place (`Slot::Replace`).
    ///
    /// Replace slots come from a form opened on this column, so an out-of-range
    /// index is a bug: it asserts in debug builds and is ignored in release.
    pub fn insert_or_replace(&mut self, slot: Slot, task: Task) -> bool {
        match slot {
            Slot::Append => {
                self.tasks.push(task);
                true
            }
            Slot::Replace(idx) => {
                debug_assert!(
                    idx < self.tasks.len(),
                    "replace slot {idx} out of range for {} ({} tasks)",
                    self.status,
                    self.tasks.len()
                );
                match self.tasks.get_mut(idx) {
                    Some(existing) => {
                        *existing = task;
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Remove the selected task and hand it back by value.
    pub fn remove_selected(&mut self) -> Option<Task> {
        if self.tasks.is_empty() {
            return None;
        }
        let idx = self.selected.min(self.tasks.len() - 1);
        let task = self.tasks.remove(idx);
        self.clamp_selection();
        Some(task)
    }

    /// Move the cursor by `delta`, stopping at either end.
    pub fn select(&mut self, delta: isize) {
        if self.tasks.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.tasks.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.tasks.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    fn clamp_selection(&mut self) {
        if self.tasks.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.tasks.len() {
            self.selected = self.tasks.len() - 1;
        }
    }
}
