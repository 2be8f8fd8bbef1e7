//! Persistence backends for the task snapshot.

use quickwin_core::Task;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Durable home of the task list. Saves always write the full snapshot.
pub trait TaskRepository {
    fn load(&self) -> Result<Vec<Task>>;
    fn save(&mut self, tasks: &[Task]) -> Result<()>;
}

/// Pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TaskRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no task file yet; starting empty");
            return Ok(vec![]);
        }

        let s = fs::read_to_string(&self.path).map_err(|e| self.io_err(e))?;
        if s.trim().is_empty() {
            return Ok(vec![]);
        }

        let tasks: Vec<Task> = serde_json::from_str(&s).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let json = serde_json::to_string_pretty(tasks).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Write beside the target then rename, so a crash never leaves half a file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;

        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// In-memory backend for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    tasks: Vec<Task>,
    saves: usize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks, saves: 0 }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl TaskRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        self.tasks = tasks.to_vec();
        self.saves += 1;
        Ok(())
    }
}
