//! Task domain model.
//!
//! A task is created and edited by the CRUD layer; the scheduler only reads
//! tasks and flips the `reminder_sent` flag. Tasks without a due time are
//! never reminder-eligible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique task identifier.
pub type TaskId = Uuid;

/// Identifier of the user who owns a task.
pub type UserId = Uuid;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// A task record as seen by the scheduler.
///
/// Invariant: `reminder_sent` transitions false→true at most once, and only
/// while `status == Pending`. The scheduler never resets it; only a due-time
/// edit through the CRUD layer may do that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absent means the task never triggers a reminder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub reminder_sent: bool,
    pub owner: UserId,
}

impl Task {
    /// Create a new pending task.
    pub fn new(owner: UserId, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            due_at: None,
            status: TaskStatus::Pending,
            reminder_sent: false,
            owner,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the due time.
    pub fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Whether this task could still receive a reminder.
    pub fn reminder_eligible(&self) -> bool {
        self.status == TaskStatus::Pending && !self.reminder_sent && self.due_at.is_some()
    }
}
