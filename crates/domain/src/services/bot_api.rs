//! Outbound Bot API seam.
//!
//! The webhook handlers and the delivery worker talk to Telegram through
//! [`BotApi`]. The HTTP implementation lives in the API crate;
//! [`MockBotApi`] records calls for development and tests.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::models::telegram::{fits_caption, ReplyMarkup};
use crate::models::MediaKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BotApiError {
    /// The user blocked the bot or the chat is gone (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bot API error {status}: {description}")]
    Api { status: u16, description: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Bot token is not configured")]
    NotConfigured,
}

impl BotApiError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, BotApiError::Forbidden(_))
    }
}

/// Bot API methods the service uses. Send methods return the message id.
#[async_trait::async_trait]
pub trait BotApi: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<i64, BotApiError>;

    /// Sends a photo, video or document by public URL.
    async fn send_media(
        &self,
        chat_id: i64,
        kind: MediaKind,
        url: &str,
        caption: Option<&str>,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<i64, BotApiError>;

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), BotApiError>;

    async fn pin_chat_message(&self, chat_id: i64, message_id: i64) -> Result<(), BotApiError>;
}

/// Sends a media item with `text`, returning the id of the message that
/// carries the text.
///
/// Text that fits a caption goes on the media. Longer text follows the media
/// as its own message, and the keyboard moves with it.
pub async fn send_media_with_text(
    bot: &dyn BotApi,
    chat_id: i64,
    kind: MediaKind,
    url: &str,
    text: &str,
    reply_markup: Option<&ReplyMarkup>,
) -> Result<i64, BotApiError> {
    if fits_caption(text) {
        let caption = (!text.is_empty()).then_some(text);
        return bot
            .send_media(chat_id, kind, url, caption, reply_markup)
            .await;
    }
    bot.send_media(chat_id, kind, url, None, None).await?;
    bot.send_message(chat_id, text, reply_markup).await
}

/// A call captured by [`MockBotApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum BotCall {
    Message {
        chat_id: i64,
        text: String,
        reply_markup: Option<ReplyMarkup>,
    },
    Media {
        chat_id: i64,
        kind: MediaKind,
        url: String,
        caption: Option<String>,
        reply_markup: Option<ReplyMarkup>,
    },
    CallbackAnswer {
        callback_query_id: String,
        text: Option<String>,
    },
    Pin {
        chat_id: i64,
        message_id: i64,
    },
}

impl BotCall {
    pub fn chat_id(&self) -> Option<i64> {
        match self {
            BotCall::Message { chat_id, .. }
            | BotCall::Media { chat_id, .. }
            | BotCall::Pin { chat_id, .. } => Some(*chat_id),
            BotCall::CallbackAnswer { .. } => None,
        }
    }
}

/// In-memory Bot API that records every call.
///
/// Chats registered with [`MockBotApi::forbid_chat`] answer send calls with
/// [`BotApiError::Forbidden`], as Telegram does for users who blocked the bot.
/// Sends whose text or caption was registered with [`MockBotApi::reject_text`]
/// fail with a 400.
#[derive(Debug, Default)]
pub struct MockBotApi {
    calls: Mutex<Vec<BotCall>>,
    forbidden_chats: Mutex<HashSet<i64>>,
    rejected_texts: Mutex<HashSet<String>>,
}

impl MockBotApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forbid_chat(&self, chat_id: i64) {
        lock(&self.forbidden_chats).insert(chat_id);
    }

    pub fn reject_text(&self, text: impl Into<String>) {
        lock(&self.rejected_texts).insert(text.into());
    }

    pub fn calls(&self) -> Vec<BotCall> {
        lock(&self.calls).clone()
    }

    /// Texts of plain messages, in send order.
    pub fn sent_texts(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                BotCall::Message { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.calls).clear();
    }

    fn record(&self, call: BotCall) -> Result<i64, BotApiError> {
        if let Some(chat_id) = call.chat_id() {
            if lock(&self.forbidden_chats).contains(&chat_id) {
                return Err(BotApiError::Forbidden(
                    "bot was blocked by the user".to_string(),
                ));
            }
        }
        let text = match &call {
            BotCall::Message { text, .. } => Some(text.as_str()),
            BotCall::Media { caption, .. } => caption.as_deref(),
            _ => None,
        };
        if text.is_some_and(|t| lock(&self.rejected_texts).contains(t)) {
            return Err(BotApiError::Api {
                status: 400,
                description: "Bad Request".to_string(),
            });
        }
        let mut calls = lock(&self.calls);
        calls.push(call);
        Ok(calls.len() as i64)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl BotApi for MockBotApi {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<i64, BotApiError> {
        tracing::debug!(chat_id, "Mock: Would send message");
        self.record(BotCall::Message {
            chat_id,
            text: text.to_string(),
            reply_markup: reply_markup.cloned(),
        })
    }

    async fn send_media(
        &self,
        chat_id: i64,
        kind: MediaKind,
        url: &str,
        caption: Option<&str>,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<i64, BotApiError> {
        tracing::debug!(chat_id, ?kind, "Mock: Would send media");
        self.record(BotCall::Media {
            chat_id,
            kind,
            url: url.to_string(),
            caption: caption.map(str::to_string),
            reply_markup: reply_markup.cloned(),
        })
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), BotApiError> {
        self.record(BotCall::CallbackAnswer {
            callback_query_id: callback_query_id.to_string(),
            text: text.map(str::to_string),
        })
        .map(|_| ())
    }

    async fn pin_chat_message(&self, chat_id: i64, message_id: i64) -> Result<(), BotApiError> {
        self.record(BotCall::Pin {
            chat_id,
            message_id,
        })
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::telegram::{InlineKeyboardButton, InlineKeyboardMarkup, CAPTION_MAX_CHARS};

    #[tokio::test]
    async fn test_mock_records_calls() {
        let bot = MockBotApi::new();
        let id = bot.send_message(42, "hello", None).await.unwrap();
        bot.pin_chat_message(42, id).await.unwrap();
        bot.answer_callback_query("cb-1", None).await.unwrap();

        assert_eq!(bot.sent_texts(), vec!["hello".to_string()]);
        assert_eq!(bot.calls().len(), 3);
        assert_eq!(
            bot.calls()[1],
            BotCall::Pin {
                chat_id: 42,
                message_id: 1
            }
        );
    }

    #[tokio::test]
    async fn test_mock_forbidden_chat() {
        let bot = MockBotApi::new();
        bot.forbid_chat(7);

        let err = bot.send_message(7, "hello", None).await.unwrap_err();
        assert!(err.is_forbidden());
        assert!(bot.calls().is_empty());

        assert!(bot
            .send_media(8, MediaKind::Photo, "https://cdn/x.png", Some("cap"), None)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_mock_rejected_text() {
        let bot = MockBotApi::new();
        bot.reject_text("broken");

        let err = bot.send_message(1, "broken", None).await.unwrap_err();
        assert!(matches!(err, BotApiError::Api { status: 400, .. }));
        assert!(bot.send_message(1, "fine", None).await.is_ok());
        assert_eq!(bot.sent_texts(), vec!["fine".to_string()]);
    }

    #[tokio::test]
    async fn test_short_text_travels_as_caption() {
        let bot = MockBotApi::new();
        let id = send_media_with_text(&bot, 9, MediaKind::Photo, "https://cdn/a.png", "Hi", None)
            .await
            .unwrap();

        assert_eq!(id, 1);
        assert_eq!(
            bot.calls(),
            vec![BotCall::Media {
                chat_id: 9,
                kind: MediaKind::Photo,
                url: "https://cdn/a.png".to_string(),
                caption: Some("Hi".to_string()),
                reply_markup: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_long_text_follows_media() {
        let bot = MockBotApi::new();
        let markup = ReplyMarkup::Inline(InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton::url("Shop", "https://shop")]],
        });
        let text = "x".repeat(CAPTION_MAX_CHARS + 1);

        let id = send_media_with_text(
            &bot,
            9,
            MediaKind::Video,
            "https://cdn/a.mp4",
            &text,
            Some(&markup),
        )
        .await
        .unwrap();

        let calls = bot.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(
            &calls[0],
            BotCall::Media { caption: None, reply_markup: None, .. }
        ));
        assert_eq!(
            calls[1],
            BotCall::Message {
                chat_id: 9,
                text,
                reply_markup: Some(markup),
            }
        );
        assert_eq!(id, 2);
    }
}
