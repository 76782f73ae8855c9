//! # reminderd
//!
//! Due-date reminder scheduling core for a personal task tracker.
//!
//! A recurring trigger scans pending tasks, selects those due inside an
//! upcoming window, dispatches one notification per task, and durably marks
//! the task so the notification never repeats.
//!
//! ```text
//!   ┌──────────────────┐   every period   ┌─────────────────┐
//!   │ ReminderScheduler│ ───────────────► │   CycleRunner   │
//!   │  (fixed cadence) │                  │ select→send→mark│
//!   └──────────────────┘                  └────────┬────────┘
//!                                                  │
//!                            ┌─────────────────────┼─────────────────┐
//!                            ▼                     ▼                 ▼
//!                     ┌────────────┐       ┌─────────────┐   ┌────────────┐
//!                     │  TaskStore │       │   Notifier  │   │  TaskStore │
//!                     │   (query)  │       │   (send)    │   │ (CAS mark) │
//!                     └────────────┘       └─────────────┘   └────────────┘
//! ```
//!
//! Delivery guarantee: at most once per task. A failed send leaves the task
//! unmarked and it is simply re-selected on later cycles while it remains in
//! the window; a successful send marks the task with a compare-and-set
//! update that is a safe no-op if the record was edited or deleted
//! concurrently.
//!
//! ## Modules
//! - `task`: domain model
//! - `store`: store contract plus the in-memory implementation
//! - `notify`: notifier contract, email adapter, mail composition
//! - `scheduler`: window evaluation, cycle runner, recurring trigger
//! - `config`: environment-driven startup configuration

pub mod config;
pub mod notify;
pub mod scheduler;
pub mod store;
pub mod task;

pub use config::SchedulerConfig;
pub use notify::{EmailNotifier, MailCredentials, Notifier, NotifyError};
pub use scheduler::{CycleOutcome, CycleRunner, ReminderScheduler, ReminderWindow};
pub use store::{MemoryTaskStore, ResetPolicy, StoreError, TaskStore};
pub use task::{Task, TaskId, TaskStatus, UserId};
