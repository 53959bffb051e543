use anyhow::Result;

use super::SnapshotStore;
use crate::domain::task::Task;

/// Session-only snapshots: nothing survives the process. Backs `--memory`,
/// `--demo`, and tests.
#[derive(Debug, Default)]
pub struct MemorySnapshots {
    tasks: Vec<Task>,
}

impl MemorySnapshots {
    pub fn with_seed(seed: impl IntoIterator<Item = Task>) -> Self {
        let mut store = Self::default();
        store.tasks.extend(seed);
        store
    }
}

impl SnapshotStore for MemorySnapshots {
    fn load(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        self.tasks = tasks.to_vec();
        Ok(())
    }
}
