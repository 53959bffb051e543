use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::SnapshotStore;
use crate::domain::task::Task;

/// One JSON file holding the full task list as an array.
pub struct JsonSnapshots {
    path: PathBuf,
}

impl JsonSnapshots {
    pub fn open_default() -> Result<Self> {
        Self::open(default_store_path()?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create store dir {}", parent.display()))?;
        }
        Ok(Self { path })
    }
}

impl SnapshotStore for JsonSnapshots {
    fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    // Temp-file + rename so a crash mid-write never leaves a torn snapshot.
    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let data = serde_json::to_vec_pretty(tasks)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &data).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| {
            format!(
                "failed to rename {} -> {}",
                tmp.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }
}

fn default_store_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("failed to resolve data dir")?;
    Ok(base.join("tasuku").join("tasks.json"))
}
