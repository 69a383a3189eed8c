use async_trait::async_trait;
use domain::models::bot_template::types;
use domain::services::parse_command;
use persistence::repositories::TelegramUserRepository;

use super::{content, BotContext, BotError, Incoming, UpdateHandler};

/// Handles `/start`, `/menu`, `/help` and unknown commands.
pub struct CommandHandler;

#[async_trait]
impl UpdateHandler for CommandHandler {
    async fn handle(&self, ctx: &BotContext, incoming: &Incoming<'_>) -> Result<(), BotError> {
        let text = incoming
            .update
            .message
            .as_ref()
            .and_then(|m| m.text.as_deref())
            .unwrap_or_default();
        let name = parse_command(text).map(|c| c.name).unwrap_or_default();
        let chat_id = incoming.chat_id;

        tracing::debug!(chat_id, command = %name, "Handling command");

        match name.as_str() {
            "start" => {
                if let Some(user) = &incoming.user {
                    TelegramUserRepository::new(ctx.pool.clone())
                        .mark_started(user.id)
                        .await?;
                }
                content::send_template(ctx, chat_id, types::WELCOME, &incoming.sender, None)
                    .await?;
                content::send_pin_messages(ctx, chat_id).await?;
                content::send_root_menu(ctx, chat_id).await
            }
            "menu" => content::send_root_menu(ctx, chat_id).await,
            "help" => content::send_template(ctx, chat_id, types::HELP, &incoming.sender, None)
                .await
                .map(|_| ()),
            _ => content::send_template(
                ctx,
                chat_id,
                types::UNKNOWN_COMMAND,
                &incoming.sender,
                None,
            )
            .await
            .map(|_| ()),
        }
    }
}
