//! Content lookups and sends shared by the update handlers.

use domain::models::telegram::ReplyMarkup;
use domain::models::{BotTemplate, MediaItem, MenuButton, MenuButtonType, PinMessage};
use domain::services::{render, send_media_with_text, TemplateContext};
use persistence::repositories::{
    BotTemplateRepository, MediaRepository, MenuButtonRepository, PinMessageRepository,
};

use super::{defaults, keyboard, BotContext, BotError};

/// Active template of `template_type` rendered for the sender, or the
/// built-in default text.
pub async fn template_text(
    ctx: &BotContext,
    template_type: &str,
    sender: &TemplateContext,
) -> Result<String, BotError> {
    let repo = BotTemplateRepository::new(ctx.pool.clone());
    let content = match repo.find_active_by_type(template_type).await? {
        Some(entity) => BotTemplate::from(entity).content,
        None => defaults::default_text(template_type).to_string(),
    };
    Ok(render(&content, sender))
}

pub async fn send_template(
    ctx: &BotContext,
    chat_id: i64,
    template_type: &str,
    sender: &TemplateContext,
    reply_markup: Option<&ReplyMarkup>,
) -> Result<i64, BotError> {
    let text = template_text(ctx, template_type, sender).await?;
    Ok(ctx.bot.send_message(chat_id, &text, reply_markup).await?)
}

/// Sends the root menu as a reply keyboard.
pub async fn send_root_menu(ctx: &BotContext, chat_id: i64) -> Result<(), BotError> {
    let repo = MenuButtonRepository::new(ctx.pool.clone());
    let roots: Vec<MenuButton> = repo
        .find_active_children(None)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    match keyboard::root_menu(&roots) {
        Some(markup) => {
            ctx.bot
                .send_message(chat_id, defaults::MENU_PROMPT, Some(&markup))
                .await?;
        }
        None => {
            ctx.bot.send_message(chat_id, defaults::MENU_EMPTY, None).await?;
        }
    }
    Ok(())
}

/// Shows an active button: its content (or media with the content as
/// caption) and its active children with a back button. A `url` button
/// answers with its label and an inline link instead.
///
/// Returns `false` when the button is missing or inactive.
pub async fn show_button(ctx: &BotContext, chat_id: i64, button_id: i64) -> Result<bool, BotError> {
    let repo = MenuButtonRepository::new(ctx.pool.clone());
    let Some(button) = repo.find_by_id(button_id).await?.map(MenuButton::from) else {
        return Ok(false);
    };
    if !button.is_active {
        return Ok(false);
    }

    if button.button_type == MenuButtonType::Url {
        if let Some(markup) = keyboard::link(&button) {
            ctx.bot
                .send_message(chat_id, &button.label, Some(&markup))
                .await?;
            return Ok(true);
        }
    }

    let children: Vec<MenuButton> = repo
        .find_active_children(Some(button.id))
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let markup = keyboard::submenu(&children, button.parent_id);

    let text = button
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(&button.label);

    send_with_optional_media(ctx, chat_id, button.media_id, text, Some(&markup)).await?;
    Ok(true)
}

/// Sends every active pin message.
pub async fn send_pin_messages(ctx: &BotContext, chat_id: i64) -> Result<(), BotError> {
    let repo = PinMessageRepository::new(ctx.pool.clone());
    let pins: Vec<PinMessage> = repo.find_active().await?.into_iter().map(Into::into).collect();
    send_pins(ctx, chat_id, &pins).await;
    Ok(())
}

/// Sends `pins` in order and pins the first one that went out. A failed pin
/// message is logged and skipped.
async fn send_pins(ctx: &BotContext, chat_id: i64, pins: &[PinMessage]) -> usize {
    let mut sent = 0;
    for pin in pins {
        let message_id =
            match send_with_optional_media(ctx, chat_id, pin.media_id, &pin.content, None).await {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(chat_id, pin_message_id = pin.id, error = %e, "Failed to send pin message");
                    continue;
                }
            };
        sent += 1;
        if sent == 1 {
            if let Err(e) = ctx.bot.pin_chat_message(chat_id, message_id).await {
                tracing::warn!(chat_id, pin_message_id = pin.id, error = %e, "Failed to pin message");
            }
        }
    }
    sent
}

/// Sends `text` alone, or with the media item `media_id` resolves to.
/// Text too long for a caption follows the media as a separate message.
pub async fn send_with_optional_media(
    ctx: &BotContext,
    chat_id: i64,
    media_id: Option<i64>,
    text: &str,
    reply_markup: Option<&ReplyMarkup>,
) -> Result<i64, BotError> {
    if let Some(media) = find_media(ctx, media_id).await? {
        let url = media.public_url(&ctx.media_base_url);
        return Ok(send_media_with_text(
            ctx.bot.as_ref(),
            chat_id,
            media.kind(),
            &url,
            text,
            reply_markup,
        )
        .await?);
    }
    Ok(ctx.bot.send_message(chat_id, text, reply_markup).await?)
}

async fn find_media(ctx: &BotContext, media_id: Option<i64>) -> Result<Option<MediaItem>, BotError> {
    let Some(id) = media_id else {
        return Ok(None);
    };
    let repo = MediaRepository::new(ctx.pool.clone());
    Ok(repo.find_by_id(id).await?.map(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::services::{BotCall, MockBotApi};
    use sqlx::PgPool;
    use std::sync::Arc;

    fn lazy_context(bot: Arc<MockBotApi>) -> BotContext {
        BotContext {
            pool: PgPool::connect_lazy("postgres://localhost/unused").unwrap(),
            bot,
            media_base_url: "http://localhost/media-files".to_string(),
        }
    }

    fn pin(id: i64, content: &str) -> PinMessage {
        let now = Utc::now();
        PinMessage {
            id,
            title: format!("Pin {id}"),
            content: content.to_string(),
            media_id: None,
            sort_order: id as i32,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_failed_pin_message_does_not_stop_the_rest() {
        let bot = Arc::new(MockBotApi::new());
        bot.reject_text("Broken notice");
        let ctx = lazy_context(bot.clone());

        let sent = send_pins(&ctx, 5, &[pin(1, "Broken notice"), pin(2, "Opening hours")]).await;

        assert_eq!(sent, 1);
        assert_eq!(
            bot.calls(),
            vec![
                BotCall::Message {
                    chat_id: 5,
                    text: "Opening hours".to_string(),
                    reply_markup: None,
                },
                BotCall::Pin {
                    chat_id: 5,
                    message_id: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_only_first_pin_message_is_pinned() {
        let bot = Arc::new(MockBotApi::new());
        let ctx = lazy_context(bot.clone());

        let sent = send_pins(&ctx, 5, &[pin(1, "First"), pin(2, "Second")]).await;

        assert_eq!(sent, 2);
        assert_eq!(bot.sent_texts(), vec!["First", "Second"]);
        let pins: Vec<_> = bot
            .calls()
            .into_iter()
            .filter(|c| matches!(c, BotCall::Pin { .. }))
            .collect();
        assert_eq!(pins, vec![BotCall::Pin { chat_id: 5, message_id: 1 }]);
    }
}
