use async_trait::async_trait;
use domain::models::bot_template::types;
use persistence::repositories::MenuButtonRepository;

use super::{content, BotContext, BotError, Incoming, UpdateHandler};

/// Handles plain messages. A text matching an active root button label opens
/// that button; anything else gets the fallback template.
pub struct MessageHandler;

#[async_trait]
impl UpdateHandler for MessageHandler {
    async fn handle(&self, ctx: &BotContext, incoming: &Incoming<'_>) -> Result<(), BotError> {
        let chat_id = incoming.chat_id;
        let text = incoming
            .update
            .message
            .as_ref()
            .and_then(|m| m.text.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if !text.is_empty() {
            let repo = MenuButtonRepository::new(ctx.pool.clone());
            if let Some(button) = repo.find_active_root_by_label(text).await? {
                if content::show_button(ctx, chat_id, button.id).await? {
                    return Ok(());
                }
            }
        }

        content::send_template(ctx, chat_id, types::FALLBACK, &incoming.sender, None).await?;
        Ok(())
    }
}
