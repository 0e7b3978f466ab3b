//! Notifier gateway.
//!
//! Abstracts the outbound alert channel behind the [`Notifier`] trait.
//! The monitor hands over finished message text; how it reaches a human
//! (Slack webhook, some other chat endpoint, a test recorder) is the
//! adapter's business.

pub mod slack;

pub use slack::SlackNotifier;

use async_trait::async_trait;

use crate::error::DeliveryError;

/// An outbound channel for human-readable alert messages.
///
/// Success means the remote endpoint acknowledged the message. Failures
/// are returned to the caller and never retried here; the monitor's
/// fixed schedule is the only retry mechanism in the system.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message.
    async fn deliver(&self, text: &str) -> Result<(), DeliveryError>;
}
