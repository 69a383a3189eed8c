//! Bot API client over HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use domain::models::telegram::ReplyMarkup;
use domain::models::MediaKind;
use domain::services::{BotApi, BotApiError};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::TelegramConfig;
use crate::middleware::metrics::record_telegram_error;

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a ReplyMarkup>,
}

pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<B, T>(&self, method: &'static str, body: &B) -> Result<T, BotApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if self.token.is_empty() {
            return Err(BotApiError::NotConfigured);
        }

        let result = self.post(method, body).await;
        if let Err(e) = &result {
            record_telegram_error(method);
            tracing::warn!(method, error = %e, "Bot API call failed");
        }
        result
    }

    async fn post<B, T>(&self, method: &str, body: &B) -> Result<T, BotApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| BotApiError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotApiError::Transport(e.without_url().to_string()))?;

        interpret(status, envelope)
    }
}

fn interpret<T>(status: StatusCode, envelope: ApiResponse<T>) -> Result<T, BotApiError> {
    let code = envelope.error_code.unwrap_or(status.as_u16());
    let description = envelope
        .description
        .unwrap_or_else(|| "no description".to_string());

    if !envelope.ok || !status.is_success() {
        return Err(if code == StatusCode::FORBIDDEN.as_u16() {
            BotApiError::Forbidden(description)
        } else {
            BotApiError::Api {
                status: code,
                description,
            }
        });
    }

    envelope.result.ok_or(BotApiError::Api {
        status: code,
        description: "response without result".to_string(),
    })
}

fn media_method(kind: MediaKind) -> (&'static str, &'static str) {
    match kind {
        MediaKind::Photo => ("sendPhoto", "photo"),
        MediaKind::Video => ("sendVideo", "video"),
        MediaKind::Document => ("sendDocument", "document"),
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<i64, BotApiError> {
        let body = SendMessageBody {
            chat_id,
            text,
            reply_markup,
        };
        let sent: SentMessage = self.call("sendMessage", &body).await?;
        Ok(sent.message_id)
    }

    async fn send_media(
        &self,
        chat_id: i64,
        kind: MediaKind,
        url: &str,
        caption: Option<&str>,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<i64, BotApiError> {
        let (method, field) = media_method(kind);
        let mut body = json!({ "chat_id": chat_id });
        body[field] = json!(url);
        if let Some(caption) = caption {
            body["caption"] = json!(caption);
        }
        if let Some(markup) = reply_markup {
            body["reply_markup"] = json!(markup);
        }
        let sent: SentMessage = self.call(method, &body).await?;
        Ok(sent.message_id)
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
    ) -> Result<(), BotApiError> {
        let body = json!({ "callback_query_id": callback_query_id, "text": text });
        let _: bool = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }

    async fn pin_chat_message(&self, chat_id: i64, message_id: i64) -> Result<(), BotApiError> {
        let body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "disable_notification": true
        });
        let _: bool = self.call("pinChatMessage", &body).await?;
        Ok(())
    }
}
