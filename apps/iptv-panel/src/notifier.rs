use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::TelegramConfig;

/// Best-effort outbound notifications. `notify` never blocks the caller and
/// never reports delivery failures.
pub trait Notify: Send + Sync {
    fn notify(&self, message: String);
}

pub fn from_config(telegram: Option<&TelegramConfig>) -> anyhow::Result<Arc<dyn Notify>> {
    match telegram {
        Some(cfg) => Ok(Arc::new(TelegramNotifier::new(cfg)?)),
        None => {
            tracing::info!("Telegram credentials not set, notifications are disabled");
            Ok(Arc::new(NoopNotifier))
        }
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Posts messages to a chat through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(cfg: &TelegramConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                cfg.api_url.trim_end_matches('/'),
                cfg.bot_token
            ),
            chat_id: cfg.chat_id.clone(),
        })
    }

    async fn send(&self, text: &str) -> reqwest::Result<()> {
        self.client
            .post(&self.endpoint)
            .json(&SendMessage { chat_id: &self.chat_id, text })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

impl Notify for TelegramNotifier {
    fn notify(&self, message: String) {
        let notifier = self.clone();
        // Detached: the response never waits on Telegram.
        tokio::spawn(async move {
            match notifier.send(&message).await {
                Ok(()) => debug!("Notification sent: {}", message),
                Err(e) => warn!("Failed to send notification '{}': {}", message, e),
            }
        });
    }
}

pub struct NoopNotifier;

impl Notify for NoopNotifier {
    fn notify(&self, message: String) {
        debug!("Notification skipped (disabled): {}", message);
    }
}
