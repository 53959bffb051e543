use time::{Date, OffsetDateTime};

use crate::domain::filter::TaskFilter;
use crate::domain::task::{Status, Task};
use crate::form::TaskForm;
use crate::store::TaskStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
}

/// View state plus the command handlers the UI dispatches to. At most one
/// task is being edited at a time; `form` doubles as the modal's visibility.
pub struct App {
    pub store: TaskStore,
    pub filter: TaskFilter,
    pub form: Option<TaskForm>,
    pub mode: InputMode,
    pub selected: usize,
    pub status: Option<String>,
}

impl App {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            filter: TaskFilter::default(),
            form: None,
            mode: InputMode::Normal,
            selected: 0,
            status: None,
        }
    }

    /// The rendered subset; recomputed from the list and both filter inputs.
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.filter.apply(self.store.tasks())
    }

    fn selected_task(&self) -> Option<Task> {
        self.visible_tasks().get(self.selected).cloned()
    }

    pub fn select_next(&mut self) {
        let len = self.visible_tasks().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Opening Add always starts from a blank form, dropping any edit state.
    pub fn open_add(&mut self) {
        self.form = Some(TaskForm::create());
        self.mode = InputMode::Form;
    }

    /// Edits a copy; the displayed row is untouched until submit.
    pub fn open_edit(&mut self) {
        if let Some(task) = self.selected_task() {
            self.form = Some(TaskForm::edit(task));
            self.mode = InputMode::Form;
        }
    }

    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let editing = form.is_edit();
        // on Err the form stays open showing the error it recorded
        if let Ok(task) = form.submit(today_local()) {
            self.store.upsert(task);
            self.form = None;
            self.mode = InputMode::Normal;
            self.clamp_selection();
            self.set_status(if editing { "Updated task" } else { "Added task" });
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.mode = InputMode::Normal;
    }

    pub fn delete_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            self.store.delete(task.id);
            self.clamp_selection();
            self.set_status("Deleted");
        }
    }

    pub fn toggle_status_filter(&mut self, status: Status) {
        self.filter.toggle_status(status);
        self.clamp_selection();
    }

    pub fn start_search(&mut self) {
        self.mode = InputMode::Search;
    }

    pub fn end_search(&mut self) {
        self.mode = InputMode::Normal;
    }

    /// Every keystroke narrows immediately; there is no debounce.
    pub fn push_search_char(&mut self, c: char) {
        self.filter.search.push(c);
        self.clamp_selection();
    }

    pub fn pop_search_char(&mut self) {
        self.filter.search.pop();
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status = Some(msg.to_string());
    }
}

pub fn today_local() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
