//! TaskStore: the canonical task list.
//!
//! Owns validation and id allocation, persists after every successful
//! mutation, and hands read-only snapshots to the ranking core.

use chrono::{DateTime, Utc};
use quickwin_core::{Task, TaskId, rank, select_within_budget};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::ids::IdAllocator;
use crate::repo::TaskRepository;
use crate::stats::Statistics;

/// Input for [`TaskStore::add`]. Ranges are checked by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub priority: i64,
    pub deadline: Option<DateTime<Utc>>,
    pub duration: i64,
}

/// Partial update. `None` keeps the current value; a blank title is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub priority: Option<i64>,
    /// `Some(None)` clears the deadline.
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub duration: Option<i64>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
            && self.duration.is_none()
    }
}

#[derive(Debug)]
pub struct TaskStore<R: TaskRepository> {
    tasks: Vec<Task>,
    ids: IdAllocator,
    repo: R,
}

impl<R: TaskRepository> TaskStore<R> {
    /// Load the snapshot from `repo`. New ids continue after the largest loaded id.
    ///
    /// Records are held to the same rules as `add`, and ids must be unique.
    pub fn open(repo: R) -> Result<Self> {
        let tasks = repo.load()?;
        let ids = IdAllocator::new();
        let mut seen = HashSet::with_capacity(tasks.len());
        for t in &tasks {
            if !seen.insert(t.id) {
                return Err(StoreError::DuplicateId(t.id));
            }
            validate_record(t)?;
            ids.observe(t.id);
        }
        debug!(count = tasks.len(), next_id = ?ids.peek(), "opened task store");

        Ok(Self { tasks, ids, repo })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn add(&mut self, new: NewTask) -> Result<Task> {
        let title = validate_title(&new.title)?;
        let priority = validate_priority(new.priority)?;
        let duration = validate_duration(new.duration)?;

        let task = Task {
            id: self.ids.next_id()?,
            title,
            priority,
            deadline: new.deadline,
            duration,
            completed: false,
        };

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.persist(next)?;

        info!(id = %task.id, title = %task.title, "added task");
        Ok(task)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// Owned copy for callers that outlive a borrow of the store.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| !t.completed).cloned().collect()
    }

    pub fn completed(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.completed).cloned().collect()
    }

    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.is_overdue(now)).cloned().collect()
    }

    /// Validate every field of the patch first, then apply it as a whole.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<Task> {
        let idx = self.index_of(id)?;

        let title = match patch.title.as_deref() {
            Some(t) if !t.trim().is_empty() => Some(t.trim().to_string()),
            _ => None,
        };
        let priority = patch.priority.map(validate_priority).transpose()?;
        let duration = patch.duration.map(validate_duration).transpose()?;

        let mut next = self.tasks.clone();
        let task = &mut next[idx];
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(priority) = priority {
            task.priority = priority;
        }
        if let Some(deadline) = patch.deadline {
            task.deadline = deadline;
        }
        if let Some(duration) = duration {
            task.duration = duration;
        }
        let updated = task.clone();

        self.persist(next)?;
        info!(id = %id, "updated task");
        Ok(updated)
    }

    pub fn mark_completed(&mut self, id: TaskId) -> Result<Task> {
        self.set_completed(id, true)
    }

    pub fn mark_pending(&mut self, id: TaskId) -> Result<Task> {
        self.set_completed(id, false)
    }

    pub fn delete(&mut self, id: TaskId) -> Result<Task> {
        let idx = self.index_of(id)?;
        let mut next = self.tasks.clone();
        let removed = next.remove(idx);

        self.persist(next)?;
        info!(id = %id, title = %removed.title, "deleted task");
        Ok(removed)
    }

    /// Ranked execution order of the pending tasks.
    pub fn schedule(&self, now: DateTime<Utc>) -> Vec<Task> {
        rank(&self.tasks, now)
    }

    /// Ranked tasks that fit in `working_minutes`.
    pub fn schedule_within(&self, now: DateTime<Utc>, working_minutes: i64) -> Vec<Task> {
        select_within_budget(&self.tasks, now, working_minutes)
    }

    pub fn statistics(&self, now: DateTime<Utc>) -> Statistics {
        Statistics::from_tasks(&self.tasks, now)
    }

    fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<Task> {
        let idx = self.index_of(id)?;
        let mut next = self.tasks.clone();
        next[idx].completed = completed;
        let task = next[idx].clone();

        self.persist(next)?;
        info!(id = %id, completed, "changed completion");
        Ok(task)
    }

    fn index_of(&self, id: TaskId) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    // In-memory state only changes once the repository accepted the write.
    fn persist(&mut self, next: Vec<Task>) -> Result<()> {
        self.repo.save(&next)?;
        self.tasks = next;
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::EmptyTitle);
    }
    Ok(title.to_string())
}

fn validate_record(task: &Task) -> Result<()> {
    let invalid = |source| StoreError::InvalidRecord {
        id: task.id,
        source: Box::new(source),
    };
    validate_title(&task.title).map_err(invalid)?;
    validate_priority(i64::from(task.priority)).map_err(invalid)?;
    validate_duration(i64::from(task.duration)).map_err(invalid)?;
    Ok(())
}

fn validate_priority(priority: i64) -> Result<u8> {
    match u8::try_from(priority) {
        Ok(p) if (1..=5).contains(&p) => Ok(p),
        _ => Err(StoreError::PriorityOutOfRange(priority)),
    }
}

fn validate_duration(duration: i64) -> Result<u32> {
    if duration <= 0 {
        return Err(StoreError::NonPositiveDuration(duration));
    }
    u32::try_from(duration).map_err(|_| StoreError::DurationTooLong(duration))
}
