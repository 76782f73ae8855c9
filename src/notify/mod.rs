//! Notification dispatch.
//!
//! The scheduler talks to the transport through the [`Notifier`] trait; the
//! shipped implementation is [`EmailNotifier`], which posts to an HTTP mail
//! API when credentials are configured and falls back to a logging-only
//! simulation mode when they are not. Simulation still reports success so
//! the marking path behaves exactly as it would with real delivery.

mod email;
pub mod message;

pub use email::{EmailNotifier, MailCredentials};

use async_trait::async_trait;
use thiserror::Error;

use crate::task::Task;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail API rejected message: {status} - {body}")]
    Rejected { status: u16, body: String },
}

/// Notification transport contract.
///
/// Implementations must resolve within a bounded time; a hung send would
/// stall the whole cycle. Timeouts are the notifier's responsibility and
/// must surface as an `Err`, never as an indefinite wait.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a reminder for `task` to `address`.
    async fn send(&self, address: &str, task: &Task) -> Result<(), NotifyError>;
}
