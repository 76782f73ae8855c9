//! reminderd daemon entry point.
//!
//! Wires configuration, store, notifier, and the recurring trigger, then
//! runs until Ctrl-C.

use std::sync::Arc;

use reminderd::{CycleRunner, EmailNotifier, MemoryTaskStore, ReminderScheduler, SchedulerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reminderd=info".into()),
        )
        .init();

    let config = SchedulerConfig::from_env();
    tracing::info!(
        lead_minutes = config.lead_time.num_minutes(),
        cycle_seconds = config.cycle_period.as_secs(),
        simulation = config.mail.is_none(),
        "Starting reminder scheduler"
    );

    let store = Arc::new(MemoryTaskStore::with_reset_policy(config.reset_policy));
    let notifier = Arc::new(EmailNotifier::new(
        config.mail.clone(),
        config.dashboard_url.clone(),
    ));
    let runner = Arc::new(CycleRunner::new(store, notifier, config.lead_time));

    let scheduler = ReminderScheduler::start(runner, config.cycle_period);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    scheduler.stop().await;

    Ok(())
}
