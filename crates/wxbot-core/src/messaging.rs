use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Outbound send path.
///
/// A thin pass-through to the transport: no retry bookkeeping, no delivery
/// confirmation, no rate limiting. Telegram is the first implementation.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()>;
}
