use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::alerts::report::ReportPayload;
use crate::error::{ChannelError, DeliveryFailure, PartialResult};

/// A destination that accepts formatted payloads.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Name used in logs and failure reports. Never the webhook URL itself.
    fn name(&self) -> &str;

    async fn deliver(&self, payload: &ReportPayload) -> Result<(), ChannelError>;
}

/// Slack (or Slack-compatible) incoming webhook.
pub struct SlackWebhookSink {
    name: String,
    webhook_url: String,
    client: Client,
}

impl SlackWebhookSink {
    pub fn new(name: impl Into<String>, webhook_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            webhook_url: webhook_url.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl NotificationSink for SlackWebhookSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, payload: &ReportPayload) -> Result<(), ChannelError> {
        debug!(destination = %self.name, header = %payload.header, "Posting to webhook");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload.to_slack_blocks())
            .send()
            .await
            .map_err(|e| ChannelError::Http(e.without_url()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(destination = %self.name, status = %status, body = %body, "Webhook request failed");
            Err(ChannelError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Delivers a payload to every configured destination, one after another.
pub struct Notifier {
    sinks: Vec<Box<dyn NotificationSink>>,
    enabled: bool,
}

impl Notifier {
    pub fn new(sinks: Vec<Box<dyn NotificationSink>>) -> Self {
        Self {
            sinks,
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            sinks: Vec::new(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn destination_count(&self) -> usize {
        if self.enabled { self.sinks.len() } else { 0 }
    }

    /// Send `payload` to each destination.
    ///
    /// A failing destination is logged and recorded; the rest are still
    /// attempted. The returned data is the number of successful deliveries.
    pub async fn deliver(&self, payload: &ReportPayload) -> PartialResult<usize, DeliveryFailure> {
        if !self.enabled {
            debug!("Notifications disabled, skipping delivery");
            return PartialResult::new(0, Vec::new());
        }

        if self.sinks.is_empty() {
            warn!("No notification destinations configured");
            return PartialResult::new(0, Vec::new());
        }

        let mut delivered = 0;
        let mut failures = Vec::new();

        for sink in &self.sinks {
            match sink.deliver(payload).await {
                Ok(()) => {
                    info!(destination = sink.name(), "Notification delivered");
                    delivered += 1;
                }
                Err(e) => {
                    error!(destination = sink.name(), error = %e, "Failed to deliver notification");
                    failures.push(DeliveryFailure {
                        destination: sink.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        PartialResult::new(delivered, failures)
    }
}
