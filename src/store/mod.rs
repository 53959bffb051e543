use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use crate::domain::task::{Task, TaskId};

pub mod json;
pub mod memory;

/// Whole-list persistence: one snapshot in, one snapshot out. No partial
/// updates, no transactions, no versioning.
pub trait SnapshotStore {
    /// Last-saved list, or empty when nothing was ever saved.
    fn load(&self) -> Result<Vec<Task>>;
    /// Overwrites the previous snapshot with the full list.
    fn save(&mut self, tasks: &[Task]) -> Result<()>;
}

pub trait IdGenerator {
    fn next_id(&mut self) -> TaskId;
}

/// Wall-clock millisecond ids, bumped past the last issued value so inserts
/// within the same millisecond stay unique.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: TaskId,
}

impl IdGenerator for ClockIds {
    fn next_id(&mut self) -> TaskId {
        self.last = now_millis().max(self.last + 1);
        self.last
    }
}

/// Deterministic counter for tests and seeded stores.
#[derive(Debug, Default)]
pub struct SequentialIds {
    last: TaskId,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> TaskId {
        self.last += 1;
        self.last
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Authoritative in-session task list. Loads the snapshot once at startup
/// and saves the full list after every mutation.
pub struct TaskStore {
    snapshots: Box<dyn SnapshotStore>,
    ids: Box<dyn IdGenerator>,
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn open(snapshots: Box<dyn SnapshotStore>, ids: Box<dyn IdGenerator>) -> Result<Self> {
        let tasks = snapshots.load()?;
        Ok(Self {
            snapshots,
            ids,
            tasks,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Replaces the task with a matching id in place (position preserved),
    /// or appends a new one under a freshly generated id. Whatever id the
    /// caller supplied is ignored for inserts. Returns the id the task ended
    /// up with.
    pub fn upsert(&mut self, mut task: Task) -> TaskId {
        let id = match self.tasks.iter().position(|t| t.id == task.id) {
            Some(idx) => {
                let id = task.id;
                self.tasks[idx] = task;
                id
            }
            None => {
                task.id = self.ids.next_id();
                let id = task.id;
                self.tasks.push(task);
                id
            }
        };
        self.persist();
        id
    }

    /// Removing an absent id leaves the list unchanged.
    pub fn delete(&mut self, id: TaskId) {
        self.tasks.retain(|t| t.id != id);
        self.persist();
    }

    // Storage failures are non-fatal: the in-memory list stays authoritative
    // and the next successful save rewrites the whole snapshot.
    fn persist(&mut self) {
        let _ = self.snapshots.save(&self.tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemorySnapshots;
    use super::*;
    use time::macros::date;

    fn store() -> TaskStore {
        TaskStore::open(
            Box::new(MemorySnapshots::default()),
            Box::new(SequentialIds::default()),
        )
        .unwrap()
    }

    fn seeded_store() -> TaskStore {
        let mut store = store();
        store.upsert(Task::new(0, "first", date!(2099 - 01 - 01)));
        store.upsert(Task::new(0, "second", date!(2099 - 01 - 02)));
        store.upsert(Task::new(0, "third", date!(2099 - 01 - 03)));
        store
    }

    #[test]
    fn insert_overrides_caller_supplied_id() {
        let mut store = store();
        let id = store.upsert(Task::new(999, "new", date!(2099 - 01 - 01)));
        assert_eq!(id, 1);
        assert_eq!(store.tasks()[0].id, 1);
    }

    #[test]
    fn edit_replaces_in_place_without_adding() {
        let mut store = seeded_store();
        let mut edited = store.tasks()[1].clone();
        edited.title = "second, renamed".to_string();
        edited.status = crate::domain::task::Status::Completed;

        let id = store.upsert(edited);
        assert_eq!(id, 2);
        assert_eq!(store.tasks().len(), 3);

        let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "second, renamed", "third"]);
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let mut store = seeded_store();
        store.delete(2);
        let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "third"]);
    }

    #[test]
    fn delete_of_absent_id_changes_nothing() {
        let mut store = seeded_store();
        store.delete(404);
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn clock_ids_never_repeat() {
        let mut ids = ClockIds::default();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
    }
}
