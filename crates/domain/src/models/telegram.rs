//! Bot API wire types.
//!
//! Only the fields the bot reads or writes are modelled; unknown fields in
//! inbound updates are ignored.

use serde::{Deserialize, Serialize};

/// An incoming update as delivered to the webhook.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Update {
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    /// The user the update originates from, if any.
    pub fn sender(&self) -> Option<&User> {
        if let Some(query) = &self.callback_query {
            return Some(&query.from);
        }
        self.message.as_ref().and_then(|m| m.from.as_ref())
    }

    /// Chat the reply should go to.
    pub fn chat_id(&self) -> Option<i64> {
        if let Some(message) = &self.message {
            return Some(message.chat.id);
        }
        self.callback_query
            .as_ref()
            .and_then(|q| q.message.as_ref())
            .map(|m| m.chat.id)
            .or_else(|| self.callback_query.as_ref().map(|q| q.from.id))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Message {
    pub message_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            callback_data: None,
        }
    }

    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            callback_data: Some(data.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    #[serde(default)]
    pub resize_keyboard: bool,
}

/// Telegram rejects media captions longer than this many characters.
pub const CAPTION_MAX_CHARS: usize = 1024;

/// Whether `text` can travel as a media caption.
pub fn fits_caption(text: &str) -> bool {
    text.chars().count() <= CAPTION_MAX_CHARS
}

/// Any keyboard that can be attached to an outgoing message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Inline(InlineKeyboardMarkup),
    Reply(ReplyKeyboardMarkup),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_update() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 10,
                "message": {
                    "message_id": 1,
                    "from": {"id": 42, "is_bot": false, "first_name": "Ada", "username": "ada"},
                    "chat": {"id": 42, "type": "private"},
                    "date": 1700000000,
                    "text": "/start",
                    "entities": [{"type": "bot_command", "offset": 0, "length": 6}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(update.chat_id(), Some(42));
        assert_eq!(update.sender().map(|u| u.id), Some(42));
        assert_eq!(update.message.unwrap().text.as_deref(), Some("/start"));
    }

    #[test]
    fn test_callback_without_message_uses_sender_chat() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 11,
                "callback_query": {
                    "id": "cb1",
                    "from": {"id": 7, "first_name": "Bob"},
                    "data": "menu:3"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(update.chat_id(), Some(7));
        assert_eq!(update.sender().map(|u| u.first_name.as_str()), Some("Bob"));
    }

    #[test]
    fn test_fits_caption_counts_characters() {
        assert!(fits_caption(""));
        assert!(fits_caption(&"a".repeat(CAPTION_MAX_CHARS)));
        assert!(!fits_caption(&"a".repeat(CAPTION_MAX_CHARS + 1)));
        // Multi-byte characters count once each.
        assert!(fits_caption(&"é".repeat(CAPTION_MAX_CHARS)));
    }

    #[test]
    fn test_reply_markup_serializes_untagged() {
        let markup = ReplyMarkup::Inline(InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton::callback("Menu", "menu:root")]],
        });
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(json["inline_keyboard"][0][0]["callback_data"], "menu:root");
        assert!(json["inline_keyboard"][0][0].get("url").is_none());

        let markup = ReplyMarkup::Reply(ReplyKeyboardMarkup {
            keyboard: vec![vec![KeyboardButton {
                text: "Catalog".to_string(),
            }]],
            resize_keyboard: true,
        });
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(json["keyboard"][0][0]["text"], "Catalog");
    }
}
