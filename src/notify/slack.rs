//! Slack incoming-webhook delivery.
//!
//! Posts alert messages as JSON to a Slack incoming webhook. A single
//! attempt per message: the request either succeeds with a 2xx response
//! within the configured timeout, or the error is reported to the caller.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::Notifier;
use crate::error::DeliveryError;

/// Default upper bound on a single delivery attempt.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Display name attached to webhook messages.
const BOT_USERNAME: &str = "PlantBot";

/// Icon attached to webhook messages.
const BOT_ICON: &str = ":herb:";

/// Delivers alert messages to a Slack incoming webhook.
///
/// Constructed with `None` as the URL, every delivery short-circuits to
/// [`DeliveryError::EndpointNotConfigured`] without touching the network,
/// so the monitor can run in log-only mode.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl SlackNotifier {
    /// Create a notifier with the default delivery timeout.
    pub fn new(webhook_url: Option<String>) -> Self {
        Self::with_timeout(webhook_url, DEFAULT_DELIVERY_TIMEOUT)
    }

    /// Create a notifier with a custom delivery timeout.
    ///
    /// The timeout bounds the whole request, so a hung endpoint cannot
    /// stall the monitor's cycle indefinitely; hitting it surfaces as
    /// [`DeliveryError::Request`] like any other transport failure.
    pub fn with_timeout(webhook_url: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            webhook_url,
        }
    }

    /// Whether a webhook URL is configured.
    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(DeliveryError::EndpointNotConfigured)?;

        let payload = serde_json::json!({
            "text": text,
            "username": BOT_USERNAME,
            "icon_emoji": BOT_ICON,
        });

        let response = self.client.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(DeliveryError::HttpStatus(response.status().as_u16()));
        }

        debug!(text, "notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unset_endpoint_short_circuits() {
        let notifier = SlackNotifier::new(None);
        assert!(!notifier.is_configured());

        // No URL, no network attempt: the error is immediate.
        let err = notifier.deliver("hello").await.unwrap_err();
        assert!(matches!(err, DeliveryError::EndpointNotConfigured));
    }

    #[test]
    fn test_configured_notifier_reports_so() {
        let notifier = SlackNotifier::new(Some("https://hooks.example/abc".to_string()));
        assert!(notifier.is_configured());
    }

    #[test]
    fn test_custom_timeout_builds() {
        let _notifier = SlackNotifier::with_timeout(None, Duration::from_secs(2));
    }
}
