//! Recurring trigger for the reminder cycle.
//!
//! A single spawned task owns the cadence: each tick awaits the full cycle
//! before the next one can start, so two cycles can never run concurrently
//! against the same store. Cycle failures are logged and swallowed; only
//! shutdown stops the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::CycleRunner;

/// Handle to the running reminder loop.
pub struct ReminderScheduler {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl ReminderScheduler {
    /// Arm the trigger: run one cycle every `period` until [`stop`] is
    /// called or the process exits.
    ///
    /// [`stop`]: ReminderScheduler::stop
    pub fn start(runner: Arc<CycleRunner>, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // A cycle that overruns its period delays later ticks instead of
            // bursting to catch up.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(period_secs = period.as_secs_f64(), "Reminder scheduler started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = runner.run_once().await {
                            // Cycle-fatal but not trigger-fatal: keep cadence.
                            tracing::error!(error = %e, "Reminder cycle aborted");
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::info!("Reminder scheduler stopping");
                        break;
                    }
                }
            }
        });

        Self {
            handle,
            shutdown_tx,
        }
    }

    /// Stop the trigger and wait for the loop (and any in-flight cycle) to
    /// finish.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}
