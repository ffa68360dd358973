//! Telegram Bot API notifier.

use async_trait::async_trait;
use serde::Serialize;
use xportfoy_core::errors::{Error, Result};
use xportfoy_core::events::{DomainEvent, Notifier};

use crate::config::TelegramConfig;

const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: String,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/bot{}/sendMessage", TELEGRAM_API, config.bot_token),
            chat_id: config.chat_id.clone(),
        }
    }

    pub fn message_for(event: &DomainEvent) -> String {
        format!(
            "[{}] {} (portfolio {})",
            event.actor_id(),
            event.describe(),
            event.portfolio_id()
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, event: &DomainEvent) -> Result<()> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text: Self::message_for(event),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Unexpected(format!("Telegram request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Unexpected(format!(
                "Telegram responded with {status}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_mentions_actor_and_portfolio() {
        let event = DomainEvent::portfolio_deleted("alice", "p1");
        assert_eq!(
            TelegramNotifier::message_for(&event),
            "[alice] Deleted portfolio p1 (portfolio p1)"
        );
    }
}
