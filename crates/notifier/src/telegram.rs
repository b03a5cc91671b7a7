use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use herald_common::config::AppConfig;

use crate::{Notifier, NotifyError};

/// Telegram Bot API notifier (`sendMessage`).
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    bot_token: String,
    chat_id: String,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(
        bot_token: String,
        chat_id: String,
        api_base: String,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            bot_token,
            chat_id,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, NotifyError> {
        Self::new(
            config.telegram_token.clone(),
            config.telegram_chat_id.clone(),
            config.telegram_api_base.clone(),
            config.http_timeout,
        )
    }

    /// Single delivery attempt, surfacing the failure to the caller.
    pub async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let body = json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        // The URL embeds the bot token; keep it out of error messages.
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
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

impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) {
        tracing::debug!(chat_id = %self.chat_id, "Sending message");
        match self.deliver(message).await {
            Ok(()) => tracing::debug!(chat_id = %self.chat_id, "Message sent"),
            Err(e) => tracing::error!(
                chat_id = %self.chat_id,
                error = %e,
                "Failed to deliver status message"
            ),
        }
    }
}
