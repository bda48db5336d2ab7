//! JSON snapshot persistence for the task collection.
//!
//! The whole collection is mirrored to a single file after every mutation.
//! Loading is lenient: a missing or malformed snapshot yields an empty
//! board, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::warn;

use crate::types::Task;

const SNAPSHOT_FILE: &str = "tasks.json";

#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("failed to determine local data directory"))?;
        Ok(data_dir.join("cyber-tasker").join(SNAPSHOT_FILE))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. Missing file means a fresh start; unreadable or
    /// malformed data is logged and treated as empty.
    pub fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            return Vec::new();
        }

        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<Vec<Task>>(&contents) {
                Ok(tasks) => tasks,
                Err(error) => {
                    warn!(
                        "malformed task snapshot '{}': {}",
                        self.path.display(),
                        error
                    );
                    Vec::new()
                }
            },
            Err(error) => {
                warn!(
                    "failed to read task snapshot '{}': {}",
                    self.path.display(),
                    error
                );
                Vec::new()
            }
        }
    }

    /// Writes the snapshot atomically: serialize to a temp file next to the
    /// target, then rename over it.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| anyhow!("invalid task snapshot path"))?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create data directory '{}'", parent.display()))?;

        let contents =
            serde_json::to_string_pretty(tasks).context("failed to serialize task snapshot")?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| anyhow!("invalid task snapshot file name"))?
            .to_string_lossy()
            .to_string();
        let tmp_path = self.path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&tmp_path, contents).with_context(|| {
            format!(
                "failed to write temporary snapshot file '{}'",
                tmp_path.display()
            )
        })?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "failed to atomically rename snapshot '{}' to '{}'",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Task, TaskStatus};
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> TaskStore {
        TaskStore::at(temp.path().join("cyber-tasker").join("tasks.json"))
    }

    #[test]
    fn load_missing_snapshot_is_empty() {
        let temp = TempDir::new().expect("temp dir should be created");
        let store = store_in(&temp);
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_malformed_snapshot_is_empty() {
        let temp = TempDir::new().expect("temp dir should be created");
        let store = store_in(&temp);
        fs::create_dir_all(store.path().parent().expect("path should have parent"))
            .expect("data dir should be created");
        fs::write(store.path(), "{not json").expect("snapshot should be written");
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().expect("temp dir should be created");
        let store = store_in(&temp);

        let mut tasks = vec![Task::new("Buy milk", 100), Task::new("Walk dog", 200)];
        tasks[1].status = TaskStatus::Completed;

        store.save(&tasks).expect("save should succeed");
        assert_eq!(store.load(), tasks);
    }

    #[test]
    fn save_creates_missing_directories() {
        let temp = TempDir::new().expect("temp dir should be created");
        let store = TaskStore::at(temp.path().join("deeply").join("nested").join("tasks.json"));
        store.save(&[]).expect("save should succeed");
        assert!(store.path().exists());
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let temp = TempDir::new().expect("temp dir should be created");
        let store = store_in(&temp);

        store
            .save(&[Task::new("first", 1)])
            .expect("save should succeed");
        store.save(&[]).expect("save should succeed");
        assert!(store.load().is_empty());
    }
}
