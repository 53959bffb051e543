use std::collections::BTreeSet;

use super::task::{Status, Task};

/// Search text plus the set of toggled status chips. Applying the filter is
/// a pure function of the task list and these two inputs.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub search: String,
    pub statuses: BTreeSet<Status>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.statuses.is_empty()
    }

    /// Flips chip membership; insertion order is irrelevant.
    pub fn toggle_status(&mut self, status: Status) {
        if !self.statuses.remove(&status) {
            self.statuses.insert(status);
        }
    }

    /// Both criteria AND together; an empty criterion passes everything.
    /// A task without a description never matches on description.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let needle = self.search.to_lowercase();
        tasks
            .iter()
            .filter(|t| {
                needle.is_empty()
                    || t.title.to_lowercase().contains(&needle)
                    || t.description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .filter(|t| self.statuses.is_empty() || self.statuses.contains(&t.status))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn sample() -> Vec<Task> {
        let due = date!(2099 - 06 - 01);
        let mut groceries = Task::new(1, "Buy groceries", due);
        groceries.description = Some("Milk and EGGS".to_string());
        let mut report = Task::new(2, "Quarterly report", due);
        report.status = Status::InProgress;
        let mut taxes = Task::new(3, "File taxes", due);
        taxes.status = Status::Completed;
        vec![groceries, report, taxes]
    }

    #[test]
    fn empty_filter_is_identity() {
        let tasks = sample();
        let filter = TaskFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&tasks), tasks);
    }

    #[test]
    fn search_matches_title_case_insensitively() {
        let tasks = sample();
        let filter = TaskFilter {
            search: "GROC".to_string(),
            ..Default::default()
        };
        let visible = filter.apply(&tasks);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn search_matches_description_but_not_missing_description() {
        let tasks = sample();
        let filter = TaskFilter {
            search: "eggs".to_string(),
            ..Default::default()
        };
        // only the groceries task has a description containing "eggs";
        // the other two have none and must not match
        let visible = filter.apply(&tasks);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn status_set_narrows_to_members() {
        let tasks = sample();
        let mut filter = TaskFilter::default();
        filter.toggle_status(Status::Completed);
        let visible = filter.apply(&tasks);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].status, Status::Completed);

        filter.toggle_status(Status::InProgress);
        assert_eq!(filter.apply(&tasks).len(), 2);

        // toggling again removes membership
        filter.toggle_status(Status::Completed);
        filter.toggle_status(Status::InProgress);
        assert!(filter.is_empty());
    }

    #[test]
    fn search_and_status_intersect() {
        let tasks = sample();
        let mut filter = TaskFilter {
            search: "report".to_string(),
            ..Default::default()
        };
        filter.toggle_status(Status::Completed);
        assert!(filter.apply(&tasks).is_empty());

        filter.toggle_status(Status::Completed);
        filter.toggle_status(Status::InProgress);
        let visible = filter.apply(&tasks);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }
}
