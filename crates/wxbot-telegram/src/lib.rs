//! Telegram adapter (teloxide).
//!
//! This crate implements the `wxbot-core` MessagingPort over the Telegram Bot
//! API and hosts the long-polling router.

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode};

pub mod router;

use wxbot_core::{domain::ChatId, errors::Error, messaging::MessagingPort, Result};

/// Thin pass-through to the Telegram send path: no retry, no delivery
/// tracking.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Telegram(e.to_string())
    }
}

#[async_trait]
impl MessagingPort for TelegramNotifier {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
        self.bot
            .send_message(Self::tg_chat(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}
