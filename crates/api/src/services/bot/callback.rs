use async_trait::async_trait;
use domain::services::CallbackAction;

use super::{content, defaults, BotContext, BotError, Incoming, UpdateHandler};

const UNKNOWN_ACTION_NOTICE: &str = "Unknown action";

/// Handles inline button presses. Every query is acknowledged.
pub struct CallbackQueryHandler;

#[async_trait]
impl UpdateHandler for CallbackQueryHandler {
    async fn handle(&self, ctx: &BotContext, incoming: &Incoming<'_>) -> Result<(), BotError> {
        let Some(query) = &incoming.update.callback_query else {
            return Ok(());
        };
        let chat_id = incoming.chat_id;

        let notice = match CallbackAction::from_query(query) {
            CallbackAction::RootMenu => {
                content::send_root_menu(ctx, chat_id).await?;
                None
            }
            CallbackAction::OpenButton(id) => {
                if content::show_button(ctx, chat_id, id).await? {
                    None
                } else {
                    Some(defaults::BUTTON_UNAVAILABLE)
                }
            }
            CallbackAction::Unknown(data) => {
                tracing::debug!(chat_id, data = %data, "Unknown callback data");
                Some(UNKNOWN_ACTION_NOTICE)
            }
        };

        ctx.bot.answer_callback_query(&query.id, notice).await?;
        Ok(())
    }
}
