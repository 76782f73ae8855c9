//! In-memory task store.
//!
//! Reference implementation of [`TaskStore`] backing the daemon binary and
//! the scheduler tests. Also carries the CRUD-side touch points the
//! scheduler interacts with indirectly: task edits and the due-time reset
//! policy for the `reminder_sent` flag.

use std::collections::HashMap;

use tokio::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{StoreError, TaskStore};
use crate::scheduler::ReminderWindow;
use crate::task::{Task, TaskId, TaskStatus, UserId};

/// When a due-time edit resets the `reminder_sent` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPolicy {
    /// Reset only when the due time actually changes value.
    #[default]
    OnDueChange,
    /// Reset on every due-time write, even a no-op resubmit.
    OnAnyDueWrite,
}

/// `RwLock<HashMap>`-backed task and user store.
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<TaskId, Task>>,
    addresses: RwLock<HashMap<UserId, String>>,
    reset_policy: ResetPolicy,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::with_reset_policy(ResetPolicy::default())
    }

    pub fn with_reset_policy(reset_policy: ResetPolicy) -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
            addresses: RwLock::new(HashMap::new()),
            reset_policy,
        }
    }

    /// Register a user's delivery address.
    pub async fn insert_user(&self, user: UserId, address: impl Into<String>) {
        self.addresses.write().await.insert(user, address.into());
    }

    /// Insert or replace a task.
    pub async fn insert_task(&self, task: Task) {
        self.tasks.write().await.insert(task.id, task);
    }

    /// Fetch a task by id.
    pub async fn get_task(&self, id: TaskId) -> Option<Task> {
        self.tasks.read().await.get(&id).cloned()
    }

    /// Delete a task. Returns the removed record, if any.
    pub async fn remove_task(&self, id: TaskId) -> Option<Task> {
        self.tasks.write().await.remove(&id)
    }

    /// Mark a task completed (the user's "done" action).
    pub async fn complete_task(&self, id: TaskId) -> bool {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&id) {
            Some(task) => {
                task.status = TaskStatus::Completed;
                true
            }
            None => false,
        }
    }

    /// Edit a task's due time (the CRUD update path).
    ///
    /// Depending on the configured [`ResetPolicy`], the edit may reset
    /// `reminder_sent` so the task becomes reminder-eligible again.
    pub async fn update_due_at(&self, id: TaskId, due_at: Option<DateTime<Utc>>) -> bool {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&id) {
            Some(task) => {
                let changed = task.due_at != due_at;
                task.due_at = due_at;
                if changed || self.reset_policy == ResetPolicy::OnAnyDueWrite {
                    task.reminder_sent = false;
                }
                true
            }
            None => false,
        }
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn find_due_soon_unnotified_pending(
        &self,
        window: &ReminderWindow,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut selected: Vec<Task> = tasks
            .values()
            .filter(|t| {
                t.status == TaskStatus::Pending
                    && !t.reminder_sent
                    && t.due_at.map(|due| window.contains(due)).unwrap_or(false)
            })
            .cloned()
            .collect();
        // Stable order keeps logs and tests deterministic.
        selected.sort_by_key(|t| (t.due_at, t.id));
        Ok(selected)
    }

    async fn resolve_owner_address(&self, owner: UserId) -> Result<Option<String>, StoreError> {
        Ok(self.addresses.read().await.get(&owner).cloned())
    }

    async fn mark_notified_if_unchanged(&self, id: TaskId) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&id) {
            Some(task) if task.status == TaskStatus::Pending && !task.reminder_sent => {
                task.reminder_sent = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
