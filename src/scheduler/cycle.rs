//! One reminder cycle: select, dispatch, mark.

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::ReminderWindow;
use crate::notify::Notifier;
use crate::store::{StoreError, TaskStore};
use crate::task::Task;

/// What a single cycle did. Consumed by logs and tests only; the scheduler
/// is fire-and-forget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Candidates returned by the selection query.
    pub selected: usize,
    /// Dispatches that succeeded.
    pub sent: usize,
    /// Tasks durably marked as notified.
    pub marked: usize,
    /// Candidates skipped because no delivery address could be resolved.
    pub skipped_no_address: usize,
    /// Dispatches that failed; these tasks stay unmarked and are retried by
    /// natural recurrence on later cycles.
    pub dispatch_failed: usize,
}

impl CycleOutcome {
    /// Whether the cycle had any candidates at all.
    pub fn is_idle(&self) -> bool {
        self.selected == 0
    }
}

/// Executes one select→dispatch→mark pass per invocation.
pub struct CycleRunner {
    store: Arc<dyn TaskStore>,
    notifier: Arc<dyn Notifier>,
    lead_time: Duration,
}

impl CycleRunner {
    pub fn new(store: Arc<dyn TaskStore>, notifier: Arc<dyn Notifier>, lead_time: Duration) -> Self {
        Self {
            store,
            notifier,
            lead_time,
        }
    }

    /// Run a single cycle.
    ///
    /// Only a selection failure aborts the cycle; every per-task failure
    /// (address resolution, dispatch, marking) is logged and skipped so the
    /// remaining candidates still get processed.
    pub async fn run_once(&self) -> Result<CycleOutcome, StoreError> {
        let window = ReminderWindow::starting_at(Utc::now(), self.lead_time);
        let candidates = self.store.find_due_soon_unnotified_pending(&window).await?;

        let mut outcome = CycleOutcome {
            selected: candidates.len(),
            ..CycleOutcome::default()
        };

        for task in &candidates {
            self.process_task(task, &mut outcome).await;
        }

        if !outcome.is_idle() {
            tracing::info!(
                selected = outcome.selected,
                sent = outcome.sent,
                marked = outcome.marked,
                "Reminder cycle processed candidates"
            );
        }
        Ok(outcome)
    }

    async fn process_task(&self, task: &Task, outcome: &mut CycleOutcome) {
        let address = match self.store.resolve_owner_address(task.owner).await {
            Ok(Some(address)) => address,
            Ok(None) => {
                tracing::warn!(task_id = %task.id, owner = %task.owner, "No delivery address for task owner, skipping");
                outcome.skipped_no_address += 1;
                return;
            }
            Err(e) => {
                tracing::warn!(task_id = %task.id, error = %e, "Address resolution failed, skipping task");
                outcome.skipped_no_address += 1;
                return;
            }
        };

        if let Err(e) = self.notifier.send(&address, task).await {
            // Left unmarked on purpose: the task stays selectable and is
            // retried next cycle until it ages out of the window.
            tracing::warn!(task_id = %task.id, error = %e, "Reminder dispatch failed, will retry next cycle");
            outcome.dispatch_failed += 1;
            return;
        }
        outcome.sent += 1;

        match self.store.mark_notified_if_unchanged(task.id).await {
            Ok(true) => {
                tracing::info!(task_id = %task.id, title = %task.title, "Reminder sent and task marked");
                outcome.marked += 1;
            }
            Ok(false) => {
                tracing::debug!(task_id = %task.id, "Task changed or vanished before marking, nothing to do");
            }
            Err(e) => {
                tracing::warn!(task_id = %task.id, error = %e, "Marking failed after successful dispatch");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use crate::notify::NotifyError;
    use crate::store::MemoryTaskStore;
    use crate::task::{TaskId, UserId};

    fn lead() -> Duration {
        Duration::minutes(30)
    }

    /// Notifier that records every invocation and can be scripted to fail
    /// the first N sends.
    struct ScriptedNotifier {
        sends: Mutex<Vec<(String, TaskId)>>,
        fail_first: AtomicUsize,
    }

    impl ScriptedNotifier {
        fn new() -> Self {
            Self {
                sends: Mutex::new(Vec::new()),
                fail_first: AtomicUsize::new(0),
            }
        }

        fn failing_first(n: usize) -> Self {
            let notifier = Self::new();
            notifier.fail_first.store(n, Ordering::SeqCst);
            notifier
        }

        async fn sends_for(&self, id: TaskId) -> usize {
            self.sends.lock().await.iter().filter(|(_, t)| *t == id).count()
        }
    }

    #[async_trait]
    impl Notifier for ScriptedNotifier {
        async fn send(&self, address: &str, task: &Task) -> Result<(), NotifyError> {
            if self
                .fail_first
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(NotifyError::Rejected {
                    status: 503,
                    body: "scripted failure".into(),
                });
            }
            self.sends.lock().await.push((address.to_string(), task.id));
            Ok(())
        }
    }

    /// Store wrapper whose selection query fails for the first N cycles.
    struct FlakyStore {
        inner: MemoryTaskStore,
        fail_queries: AtomicUsize,
    }

    impl FlakyStore {
        fn new(inner: MemoryTaskStore, fail_queries: usize) -> Self {
            Self {
                inner,
                fail_queries: AtomicUsize::new(fail_queries),
            }
        }
    }

    #[async_trait]
    impl TaskStore for FlakyStore {
        async fn find_due_soon_unnotified_pending(
            &self,
            window: &ReminderWindow,
        ) -> Result<Vec<Task>, StoreError> {
            if self
                .fail_queries
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(StoreError::Query("connection reset".into()));
            }
            self.inner.find_due_soon_unnotified_pending(window).await
        }

        async fn resolve_owner_address(&self, owner: UserId) -> Result<Option<String>, StoreError> {
            self.inner.resolve_owner_address(owner).await
        }

        async fn mark_notified_if_unchanged(&self, id: TaskId) -> Result<bool, StoreError> {
            self.inner.mark_notified_if_unchanged(id).await
        }
    }

    async fn seeded_store(due_in: Duration) -> (MemoryTaskStore, TaskId, UserId) {
        let store = MemoryTaskStore::new();
        let owner = Uuid::new_v4();
        store.insert_user(owner, "owner@example.com").await;
        let task = Task::new(owner, "Upcoming task")
            .with_description("details")
            .with_due_at(Utc::now() + due_in);
        let id = task.id;
        store.insert_task(task).await;
        (store, id, owner)
    }

    #[tokio::test]
    async fn in_window_task_is_dispatched_once_and_marked() {
        // Scenario A: due in 25 minutes, lead 30 minutes.
        let (store, id, _) = seeded_store(Duration::minutes(25)).await;
        let store = Arc::new(store);
        let notifier = Arc::new(ScriptedNotifier::new());
        let runner = CycleRunner::new(store.clone(), notifier.clone(), lead());

        let outcome = runner.run_once().await.unwrap();
        assert_eq!(outcome.selected, 1);
        assert_eq!(outcome.sent, 1);
        assert_eq!(outcome.marked, 1);
        assert_eq!(notifier.sends_for(id).await, 1);
        assert!(store.get_task(id).await.unwrap().reminder_sent);
    }

    #[tokio::test]
    async fn out_of_window_task_is_not_selected() {
        // Scenario B: due in 40 minutes.
        let (store, id, _) = seeded_store(Duration::minutes(40)).await;
        let store = Arc::new(store);
        let notifier = Arc::new(ScriptedNotifier::new());
        let runner = CycleRunner::new(store.clone(), notifier.clone(), lead());

        let outcome = runner.run_once().await.unwrap();
        assert!(outcome.is_idle());
        assert_eq!(notifier.sends_for(id).await, 0);
    }

    #[tokio::test]
    async fn already_notified_task_is_not_selected() {
        // Scenario C: due in 10 minutes but already notified.
        let (store, id, _) = seeded_store(Duration::minutes(10)).await;
        store.mark_notified_if_unchanged(id).await.unwrap();
        let store = Arc::new(store);
        let notifier = Arc::new(ScriptedNotifier::new());
        let runner = CycleRunner::new(store, notifier.clone(), lead());

        let outcome = runner.run_once().await.unwrap();
        assert!(outcome.is_idle());
        assert_eq!(notifier.sends_for(id).await, 0);
    }

    #[tokio::test]
    async fn repeated_cycles_never_dispatch_twice() {
        let (store, id, _) = seeded_store(Duration::minutes(20)).await;
        let store = Arc::new(store);
        let notifier = Arc::new(ScriptedNotifier::new());
        let runner = CycleRunner::new(store, notifier.clone(), lead());

        for _ in 0..5 {
            runner.run_once().await.unwrap();
        }
        assert_eq!(notifier.sends_for(id).await, 1);
    }

    #[tokio::test]
    async fn failed_dispatch_is_retried_on_next_cycle() {
        // Scenario D: first dispatch fails, second succeeds.
        let (store, id, _) = seeded_store(Duration::minutes(20)).await;
        let store = Arc::new(store);
        let notifier = Arc::new(ScriptedNotifier::failing_first(1));
        let runner = CycleRunner::new(store.clone(), notifier.clone(), lead());

        let first = runner.run_once().await.unwrap();
        assert_eq!(first.dispatch_failed, 1);
        assert_eq!(first.sent, 0);
        assert!(!store.get_task(id).await.unwrap().reminder_sent);

        let second = runner.run_once().await.unwrap();
        assert_eq!(second.sent, 1);
        assert_eq!(second.marked, 1);
        assert!(store.get_task(id).await.unwrap().reminder_sent);
        assert_eq!(notifier.sends_for(id).await, 1);
    }

    #[tokio::test]
    async fn selection_failure_aborts_cycle_and_next_cycle_recovers() {
        // Scenario E: query fails on cycle N, cycle N+1 runs normally.
        let (inner, id, _) = seeded_store(Duration::minutes(20)).await;
        let store = Arc::new(FlakyStore::new(inner, 1));
        let notifier = Arc::new(ScriptedNotifier::new());
        let runner = CycleRunner::new(store, notifier.clone(), lead());

        assert!(runner.run_once().await.is_err());
        assert_eq!(notifier.sends_for(id).await, 0);

        let outcome = runner.run_once().await.unwrap();
        assert_eq!(outcome.sent, 1);
        assert_eq!(notifier.sends_for(id).await, 1);
    }

    #[tokio::test]
    async fn missing_address_skips_task_without_aborting_cycle() {
        let store = MemoryTaskStore::new();
        let orphan_owner = Uuid::new_v4(); // never registered
        let known_owner = Uuid::new_v4();
        store.insert_user(known_owner, "known@example.com").await;

        let orphan = Task::new(orphan_owner, "Orphan").with_due_at(Utc::now() + Duration::minutes(5));
        let reachable =
            Task::new(known_owner, "Reachable").with_due_at(Utc::now() + Duration::minutes(10));
        let reachable_id = reachable.id;
        store.insert_task(orphan).await;
        store.insert_task(reachable).await;

        let store = Arc::new(store);
        let notifier = Arc::new(ScriptedNotifier::new());
        let runner = CycleRunner::new(store.clone(), notifier.clone(), lead());

        let outcome = runner.run_once().await.unwrap();
        assert_eq!(outcome.selected, 2);
        assert_eq!(outcome.skipped_no_address, 1);
        assert_eq!(outcome.sent, 1);
        assert_eq!(notifier.sends_for(reachable_id).await, 1);
    }

    #[tokio::test]
    async fn delete_between_selection_and_mark_is_a_noop() {
        // The notifier deletes the task mid-flight, simulating a concurrent
        // CRUD delete between selection and marking.
        struct DeletingNotifier {
            store: Arc<MemoryTaskStore>,
        }

        #[async_trait]
        impl Notifier for DeletingNotifier {
            async fn send(&self, _address: &str, task: &Task) -> Result<(), NotifyError> {
                self.store.remove_task(task.id).await;
                Ok(())
            }
        }

        let (store, _, _) = seeded_store(Duration::minutes(15)).await;
        let store = Arc::new(store);
        let notifier = Arc::new(DeletingNotifier { store: store.clone() });
        let runner = CycleRunner::new(store, notifier, lead());

        let outcome = runner.run_once().await.unwrap();
        assert_eq!(outcome.sent, 1);
        assert_eq!(outcome.marked, 0);
    }
}
