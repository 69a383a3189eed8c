//! Bot update handling.
//!
//! [`UpdateDispatcher`] classifies an update, records its sender and hands it
//! to exactly one [`UpdateHandler`].

mod callback;
mod command;
pub mod content;
pub mod defaults;
pub mod keyboard;
mod message;

use std::sync::Arc;

use async_trait::async_trait;
use domain::models::telegram::{Update, User};
use domain::models::{TelegramUser, TelegramUserProfile};
use domain::services::{classify, BotApi, BotApiError, TemplateContext, UpdateKind};
use persistence::repositories::TelegramUserRepository;
use sqlx::PgPool;
use thiserror::Error;

use crate::middleware::metrics::record_telegram_update;

pub use callback::CallbackQueryHandler;
pub use command::CommandHandler;
pub use message::MessageHandler;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bot API error: {0}")]
    Telegram(#[from] BotApiError),
}

/// Dependencies shared by the handlers.
#[derive(Clone)]
pub struct BotContext {
    pub pool: PgPool,
    pub bot: Arc<dyn BotApi>,
    /// Base URL media files are publicly served from.
    pub media_base_url: String,
}

/// An update prepared for a handler.
pub struct Incoming<'a> {
    pub update: &'a Update,
    pub chat_id: i64,
    /// The sender's stored record, when the update has a sender.
    pub user: Option<TelegramUser>,
    pub sender: TemplateContext,
}

#[async_trait]
pub trait UpdateHandler: Send + Sync {
    async fn handle(&self, ctx: &BotContext, incoming: &Incoming<'_>) -> Result<(), BotError>;
}

pub struct UpdateDispatcher {
    ctx: BotContext,
    command: CommandHandler,
    callback: CallbackQueryHandler,
    message: MessageHandler,
}

impl UpdateDispatcher {
    pub fn new(ctx: BotContext) -> Self {
        Self {
            ctx,
            command: CommandHandler,
            callback: CallbackQueryHandler,
            message: MessageHandler,
        }
    }

    /// Routes one update and returns how it was classified.
    pub async fn dispatch(&self, update: &Update) -> Result<UpdateKind, BotError> {
        let kind = classify(update);
        record_telegram_update(kind.as_str());

        let handler: &dyn UpdateHandler = match kind {
            UpdateKind::Command => &self.command,
            UpdateKind::CallbackQuery => &self.callback,
            UpdateKind::Message => &self.message,
            UpdateKind::Ignored => return Ok(kind),
        };
        let Some(chat_id) = update.chat_id() else {
            return Ok(UpdateKind::Ignored);
        };

        let user = match update.sender() {
            Some(sender) => {
                let repo = TelegramUserRepository::new(self.ctx.pool.clone());
                let entity = repo.upsert(&profile(sender, chat_id)).await?;
                Some(TelegramUser::from(entity))
            }
            None => None,
        };

        let incoming = Incoming {
            update,
            chat_id,
            user,
            sender: update.sender().map(TemplateContext::from).unwrap_or_default(),
        };

        tracing::debug!(
            update_id = update.update_id,
            chat_id,
            kind = kind.as_str(),
            "Dispatching update"
        );
        handler.handle(&self.ctx, &incoming).await?;
        Ok(kind)
    }
}

fn profile(sender: &User, chat_id: i64) -> TelegramUserProfile {
    TelegramUserProfile {
        telegram_id: sender.id,
        chat_id,
        username: sender.username.clone(),
        first_name: Some(sender.first_name.clone()).filter(|n| !n.is_empty()),
        last_name: sender.last_name.clone(),
        language_code: sender.language_code.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::services::MockBotApi;

    fn lazy_context(bot: Arc<MockBotApi>) -> BotContext {
        BotContext {
            pool: PgPool::connect_lazy("postgres://localhost/unused").unwrap(),
            bot,
            media_base_url: "http://localhost/media-files".to_string(),
        }
    }

    #[test]
    fn test_profile_from_sender() {
        let sender = User {
            id: 42,
            is_bot: false,
            first_name: "Ada".to_string(),
            last_name: None,
            username: Some("ada".to_string()),
            language_code: Some("en".to_string()),
        };
        let profile = profile(&sender, 100);
        assert_eq!(profile.telegram_id, 42);
        assert_eq!(profile.chat_id, 100);
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
        assert_eq!(profile.username.as_deref(), Some("ada"));
    }

    #[tokio::test]
    async fn test_ignored_update_touches_nothing() {
        let bot = Arc::new(MockBotApi::new());
        let dispatcher = UpdateDispatcher::new(lazy_context(bot.clone()));
        let update: Update = serde_json::from_str(r#"{"update_id": 5}"#).unwrap();

        let kind = dispatcher.dispatch(&update).await.unwrap();
        assert_eq!(kind, UpdateKind::Ignored);
        assert!(bot.calls().is_empty());
    }
}
