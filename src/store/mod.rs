//! Task store contract.
//!
//! The persistent task/user store lives outside this crate (it belongs to the
//! CRUD layer); the scheduler consumes it through the [`TaskStore`] trait.
//! The only mutation the scheduler ever issues is the conditional
//! mark-as-notified update, which must behave as compare-and-set so a record
//! edited or deleted mid-cycle turns the mark into a safe no-op.

mod memory;

pub use memory::{MemoryTaskStore, ResetPolicy};

use async_trait::async_trait;
use thiserror::Error;

use crate::scheduler::ReminderWindow;
use crate::task::{Task, TaskId, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store query failed: {0}")]
    Query(String),

    #[error("store update failed: {0}")]
    Update(String),
}

/// Query/update interface over task and user records.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks with `status == Pending`, `reminder_sent == false`, and a
    /// due time inside `window`, as a single atomic query.
    async fn find_due_soon_unnotified_pending(
        &self,
        window: &ReminderWindow,
    ) -> Result<Vec<Task>, StoreError>;

    /// Delivery address for a task owner. `Ok(None)` when the owner is
    /// missing or has no address on record.
    async fn resolve_owner_address(&self, owner: UserId) -> Result<Option<String>, StoreError>;

    /// Set `reminder_sent = true` iff the task still exists, is still
    /// pending, and is still unmarked. Returns `Ok(false)` when the record
    /// changed or vanished since selection; never an error in that case.
    async fn mark_notified_if_unchanged(&self, id: TaskId) -> Result<bool, StoreError>;
}
