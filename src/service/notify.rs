use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;

/// Outbound notification channel. Delivery is fire-and-forget: `send`
/// reports success or failure but callers must never fail on it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> bool;
}

/// Delivers notifications as a JSON POST to a configured webhook, which
/// the mail relay picks up. Non-2xx or transport errors count as failure.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> bool {
        let payload = json!({
            "to": destination,
            "subject": subject,
            "body": body,
        });

        match self.client.post(&self.url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!(to = destination, "notification delivered");
                true
            }
            Ok(resp) => {
                warn!(to = destination, status = %resp.status(), "notification rejected");
                false
            }
            Err(e) => {
                warn!(to = destination, error = %e, "notification delivery failed");
                false
            }
        }
    }
}

/// Used when no webhook is configured. Always reports failure so the
/// caller surfaces "not notified" honestly.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, destination: &str, _subject: &str, _body: &str) -> bool {
        warn!(to = destination, "no notification channel configured, dropping message");
        false
    }
}

pub fn from_config(config: &Config) -> Arc<dyn Notifier> {
    match &config.notify_webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(NoopNotifier),
    }
}
