use thiserror::Error;
use time::Date;

use crate::domain::task::{self, Status, Task, TaskId};

/// Id handed to the store for brand-new tasks; the store replaces it on
/// insert with a freshly generated one.
pub const PLACEHOLDER_ID: TaskId = 0;

/// Shown inline on the open form; never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and Due Date are required!")]
    MissingRequired,
    #[error("Due date cannot be in the past.")]
    DueDateInPast,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Field {
    #[default]
    Title,
    Description,
    DueDate,
    Status,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Title,
        Field::Description,
        Field::DueDate,
        Field::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::DueDate => "Due Date",
            Field::Status => "Status",
        }
    }
}

/// The add/edit form. Create mode starts blank; Edit mode is pre-filled from
/// a copy of the task, so the displayed row stays untouched until submit.
#[derive(Debug, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: Status,
    pub focus: Field,
    pub error: Option<ValidationError>,
    initial: Option<Task>,
}

impl TaskForm {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(task: Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task::format_date(task.due_date),
            status: task.status,
            focus: Field::Title,
            error: None,
            initial: Some(task),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.initial.is_some()
    }

    pub fn focus_next(&mut self) {
        let idx = Field::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = Field::ALL[(idx + 1) % Field::ALL.len()];
    }

    pub fn focus_prev(&mut self) {
        let idx = Field::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = Field::ALL[(idx + Field::ALL.len() - 1) % Field::ALL.len()];
    }

    /// Text buffer under the cursor; `None` while the status selector is
    /// focused.
    pub fn focused_buffer(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Title => Some(&mut self.title),
            Field::Description => Some(&mut self.description),
            Field::DueDate => Some(&mut self.due_date),
            Field::Status => None,
        }
    }

    /// Validates and emits the finished task. Checks run in order: required
    /// fields first, then the due date must parse and be `today` or later.
    /// Only the most recent error is kept; a successful submit resets the
    /// form.
    pub fn submit(&mut self, today: Date) -> Result<Task, ValidationError> {
        self.error = None;

        if self.title.is_empty() || self.due_date.is_empty() {
            self.error = Some(ValidationError::MissingRequired);
            return Err(ValidationError::MissingRequired);
        }

        let due_date = match task::parse_date(&self.due_date) {
            Some(date) if date >= today => date,
            _ => {
                self.error = Some(ValidationError::DueDateInPast);
                return Err(ValidationError::DueDateInPast);
            }
        };

        let task = Task {
            id: self.initial.as_ref().map_or(PLACEHOLDER_ID, |t| t.id),
            title: self.title.clone(),
            description: if self.description.is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
            due_date,
            status: self.status,
        };
        self.reset();
        Ok(task)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2025 - 03 - 10);

    fn filled_form() -> TaskForm {
        let mut form = TaskForm::create();
        form.title = "Water the plants".to_string();
        form.due_date = "2025-03-12".to_string();
        form
    }

    #[test]
    fn create_submit_emits_placeholder_id_and_resets() {
        let mut form = filled_form();
        form.description = "Balcony first".to_string();
        form.status = Status::InProgress;

        let task = form.submit(TODAY).unwrap();
        assert_eq!(task.id, PLACEHOLDER_ID);
        assert_eq!(task.title, "Water the plants");
        assert_eq!(task.description.as_deref(), Some("Balcony first"));
        assert_eq!(task.due_date, date!(2025 - 03 - 12));
        assert_eq!(task.status, Status::InProgress);

        assert!(form.title.is_empty());
        assert_eq!(form.status, Status::Pending);
        assert_eq!(form.error, None);
    }

    #[test]
    fn empty_description_is_emitted_as_none() {
        let mut form = filled_form();
        let task = form.submit(TODAY).unwrap();
        assert_eq!(task.description, None);
    }

    #[test]
    fn missing_title_or_due_date_is_rejected() {
        let mut form = filled_form();
        form.title.clear();
        assert_eq!(form.submit(TODAY), Err(ValidationError::MissingRequired));
        assert_eq!(form.error, Some(ValidationError::MissingRequired));

        let mut form = filled_form();
        form.due_date.clear();
        assert_eq!(form.submit(TODAY), Err(ValidationError::MissingRequired));
    }

    #[test]
    fn past_due_date_is_rejected_and_today_is_allowed() {
        let mut form = filled_form();
        form.due_date = "2025-03-09".to_string();
        assert_eq!(form.submit(TODAY), Err(ValidationError::DueDateInPast));

        form.due_date = "2025-03-10".to_string();
        form.title = "Water the plants".to_string();
        assert!(form.submit(TODAY).is_ok());
    }

    #[test]
    fn unparseable_due_date_reads_as_past() {
        let mut form = filled_form();
        form.due_date = "not-a-date".to_string();
        assert_eq!(form.submit(TODAY), Err(ValidationError::DueDateInPast));
    }

    #[test]
    fn error_clears_on_successful_resubmission() {
        let mut form = filled_form();
        form.title.clear();
        assert!(form.submit(TODAY).is_err());
        assert!(form.error.is_some());

        form.title = "Fixed".to_string();
        assert!(form.submit(TODAY).is_ok());
        assert_eq!(form.error, None);
    }

    #[test]
    fn edit_prefills_fields_and_preserves_id() {
        let mut task = Task::new(42, "Original", date!(2025 - 04 - 01));
        task.description = Some("notes".to_string());
        task.status = Status::Completed;

        let mut form = TaskForm::edit(task);
        assert!(form.is_edit());
        assert_eq!(form.title, "Original");
        assert_eq!(form.description, "notes");
        assert_eq!(form.due_date, "2025-04-01");
        assert_eq!(form.status, Status::Completed);

        form.title = "Renamed".to_string();
        let edited = form.submit(TODAY).unwrap();
        assert_eq!(edited.id, 42);
        assert_eq!(edited.title, "Renamed");
    }

    #[test]
    fn error_messages_match_the_form_copy() {
        assert_eq!(
            ValidationError::MissingRequired.to_string(),
            "Title and Due Date are required!"
        );
        assert_eq!(
            ValidationError::DueDateInPast.to_string(),
            "Due date cannot be in the past."
        );
    }
}
