//! Scheduler configuration.
//!
//! Read once at startup from environment variables. Mail credentials are
//! optional: when any of them is missing the notifier runs in simulation
//! mode (logged sends that still count as delivered).

use chrono::Duration;

use crate::notify::MailCredentials;
use crate::store::ResetPolicy;

/// Default lead time before a due task becomes reminder-eligible.
const DEFAULT_LEAD_MINUTES: i64 = 30;

/// Default period between reminder cycles.
const DEFAULT_CYCLE_SECONDS: u64 = 60;

/// Runtime configuration for the reminder scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Window length: tasks due within this span of "now" are eligible.
    pub lead_time: Duration,
    /// How often a cycle runs.
    pub cycle_period: std::time::Duration,
    /// Mail API credentials; `None` selects simulation mode.
    pub mail: Option<MailCredentials>,
    /// Base URL used for the dashboard link in mail bodies.
    pub dashboard_url: String,
    /// Whether a no-op due-time resubmit also resets the reminder flag.
    pub reset_policy: ResetPolicy,
}

impl SchedulerConfig {
    /// Load configuration from the environment.
    ///
    /// Recognized variables:
    /// - `REMINDER_LEAD_MINUTES` (default 30)
    /// - `REMINDER_CYCLE_SECONDS` (default 60)
    /// - `MAIL_API_URL`, `MAIL_API_KEY`, `MAIL_FROM` (all three required for
    ///   real delivery)
    /// - `DASHBOARD_URL` (default `http://localhost:5173`)
    /// - `RESET_REMINDER_ON_SAME_DUE` (`true`/`1` to reset on any due write)
    pub fn from_env() -> Self {
        let lead_minutes = env_parse("REMINDER_LEAD_MINUTES", DEFAULT_LEAD_MINUTES);
        let cycle_seconds = env_parse("REMINDER_CYCLE_SECONDS", DEFAULT_CYCLE_SECONDS);

        let mail = match (
            std::env::var("MAIL_API_URL"),
            std::env::var("MAIL_API_KEY"),
            std::env::var("MAIL_FROM"),
        ) {
            (Ok(api_url), Ok(api_key), Ok(from)) => Some(MailCredentials {
                api_url,
                api_key,
                from,
            }),
            _ => None,
        };

        let reset_policy = match std::env::var("RESET_REMINDER_ON_SAME_DUE").as_deref() {
            Ok("true") | Ok("1") => ResetPolicy::OnAnyDueWrite,
            _ => ResetPolicy::OnDueChange,
        };

        Self {
            lead_time: Duration::minutes(lead_minutes),
            cycle_period: std::time::Duration::from_secs(cycle_seconds),
            mail,
            dashboard_url: std::env::var("DASHBOARD_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            reset_policy,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lead_time: Duration::minutes(DEFAULT_LEAD_MINUTES),
            cycle_period: std::time::Duration::from_secs(DEFAULT_CYCLE_SECONDS),
            mail: None,
            dashboard_url: "http://localhost:5173".to_string(),
            reset_policy: ResetPolicy::OnDueChange,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, "Unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}
