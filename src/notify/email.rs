//! Email notifier.
//!
//! Delivers reminder mail through a JSON HTTP mail API (any
//! Mailgun/Resend-style endpoint accepting from/to/subject/text/html).
//! Without credentials it runs in simulation mode: the message is logged in
//! full and reported as delivered, which keeps the scheduler's marking
//! behavior exercisable without delivery infrastructure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{message, Notifier, NotifyError};
use crate::task::Task;

/// How long a single send may take before it counts as failed.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials for the HTTP mail API.
#[derive(Debug, Clone)]
pub struct MailCredentials {
    /// Endpoint accepting a JSON message via POST.
    pub api_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Sender address.
    pub from: String,
}

/// Notifier that sends reminder mail, or simulates it when unconfigured.
pub struct EmailNotifier {
    client: Client,
    credentials: Option<MailCredentials>,
    dashboard_url: String,
}

impl EmailNotifier {
    /// Create a notifier. `credentials = None` selects simulation mode.
    pub fn new(credentials: Option<MailCredentials>, dashboard_url: impl Into<String>) -> Self {
        match &credentials {
            Some(c) => tracing::info!(api_url = %c.api_url, "Email notifier configured for real delivery"),
            None => tracing::warn!("No mail credentials found, email notifier running in simulation mode"),
        }
        Self {
            client: Client::builder()
                .timeout(SEND_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            credentials,
            dashboard_url: dashboard_url.into(),
        }
    }

    async fn deliver(
        &self,
        credentials: &MailCredentials,
        address: &str,
        task: &Task,
    ) -> Result<(), NotifyError> {
        let body = serde_json::json!({
            "from": credentials.from,
            "to": address,
            "subject": message::subject(task),
            "text": message::text_body(task, &self.dashboard_url),
            "html": message::html_body(task, &self.dashboard_url),
        });

        let resp = self
            .client
            .post(&credentials.api_url)
            .header("Authorization", format!("Bearer {}", credentials.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, address: &str, task: &Task) -> Result<(), NotifyError> {
        match &self.credentials {
            Some(credentials) => {
                self.deliver(credentials, address, task).await?;
                tracing::info!(to = %address, task = %task.title, "Reminder email sent");
                Ok(())
            }
            None => {
                // Simulation: log the message and report success so the
                // marking step still runs.
                tracing::info!(
                    to = %address,
                    subject = %message::subject(task),
                    due = ?task.due_at,
                    "Simulated reminder email (no mail credentials configured)"
                );
                Ok(())
            }
        }
    }
}
