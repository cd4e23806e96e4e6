//! Minimal Telegram Bot API client: the calls the bot makes, nothing else.

use anyhow::{Context, Result};
use async_trait::async_trait;
use kb_engine::{EngineError, Transport, TransportError};
use kb_protocol::{ButtonLayout, ChatId, InboundEvent, MessageId};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;

const PARSE_MODE: &str = "HTML";
const FALLBACK_USER_NAME: &str = "Пользователь";

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub chat: Chat,
    pub from: Option<BotUser>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    /// Core event for this update.
    ///
    /// `Ok(None)` for updates the bot ignores (stickers, edits, ...);
    /// `Err` when a button press lacks the fields needed to answer it.
    pub fn into_event(self) -> std::result::Result<Option<InboundEvent>, EngineError> {
        if let Some(query) = self.callback_query {
            let message = query.message.ok_or_else(|| {
                EngineError::malformed(format!("callback {} without message", query.id))
            })?;
            let token = query.data.ok_or_else(|| {
                EngineError::malformed(format!("callback {} without data", query.id))
            })?;
            return Ok(Some(InboundEvent::ButtonPress {
                chat_id: message.chat.id,
                message_id: message.message_id,
                interaction_id: query.id,
                token,
            }));
        }
        let Some(message) = self.message else {
            return Ok(None);
        };
        let Some(text) = message.text else {
            return Ok(None);
        };
        let user_display_name = message
            .from
            .map(|user| user.first_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_USER_NAME.to_string());
        Ok(Some(InboundEvent::Message {
            chat_id: message.chat.id,
            user_display_name,
            text,
        }))
    }
}

/// Outcome of one `getUpdates` entry.
pub type EventOutcome = std::result::Result<Option<InboundEvent>, EngineError>;

/// Parse a raw `getUpdates` batch entry by entry.
///
/// Returns the next offset and one outcome per entry. An entry that does not
/// deserialize becomes a `MalformedEvent` and still moves the offset past its
/// `update_id`, so it is never fetched again.
pub fn parse_batch(batch: Vec<Value>, offset: i64) -> (i64, Vec<EventOutcome>) {
    let mut next = offset;
    let mut outcomes = Vec::with_capacity(batch.len());
    for raw in batch {
        if let Some(update_id) = raw.get("update_id").and_then(Value::as_i64) {
            next = next.max(update_id + 1);
        }
        let outcome = serde_json::from_value::<Update>(raw)
            .map_err(|err| EngineError::malformed(format!("unparsable update: {err}")))
            .and_then(Update::into_event);
        outcomes.push(outcome);
    }
    (next, outcomes)
}

#[derive(Debug, Serialize)]
struct InlineButton<'a> {
    text: &'a str,
    callback_data: &'a str,
}

fn reply_markup(layout: &ButtonLayout) -> Value {
    let rows: Vec<Vec<InlineButton<'_>>> = layout
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| InlineButton {
                    text: &button.label,
                    callback_data: &button.token,
                })
                .collect()
        })
        .collect();
    json!({ "inline_keyboard": rows })
}

pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, token: &str, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: format!("{}/bot{token}", api_base.trim_end_matches('/')),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &Value,
    ) -> std::result::Result<T, TransportError> {
        let response = self
            .http
            .post(self.url(method))
            .json(body)
            .send()
            .await
            .map_err(|err| TransportError::request(format!("{method}: {}", err.without_url())))?;
        Self::unpack(method, response).await
    }

    async fn unpack<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> std::result::Result<T, TransportError> {
        let status = response.status();
        let body: ApiResponse<T> = response.json().await.map_err(|err| {
            TransportError::request(format!("{method}: HTTP {status}: {}", err.without_url()))
        })?;
        match (body.ok, body.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TransportError::api(
                method,
                body.description
                    .unwrap_or_else(|| format!("HTTP {status} without description")),
            )),
        }
    }

    pub async fn get_me(&self) -> std::result::Result<BotUser, TransportError> {
        self.call("getMe", &json!({})).await
    }

    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> std::result::Result<Vec<Value>, TransportError> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn deliver_text(
        &self,
        chat_id: ChatId,
        text: &str,
        layout: Option<&ButtonLayout>,
    ) -> std::result::Result<(), TransportError> {
        let mut body = json!({ "chat_id": chat_id, "text": text, "parse_mode": PARSE_MODE });
        if let Some(layout) = layout {
            body["reply_markup"] = reply_markup(layout);
        }
        self.call::<Value>("sendMessage", &body).await.map(|_| ())
    }

    async fn deliver_document(
        &self,
        chat_id: ChatId,
        file: &Path,
        display_name: &str,
        caption: &str,
    ) -> std::result::Result<(), TransportError> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|source| TransportError::Io {
                path: file.to_path_buf(),
                source,
            })?;
        log::debug!("uploading {} ({} bytes)", file.display(), bytes.len());
        let part = Part::bytes(bytes)
            .file_name(display_name.to_string())
            .mime_str("application/pdf")
            .map_err(|err| TransportError::request(err.to_string()))?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .text("parse_mode", PARSE_MODE)
            .part("document", part);
        let response = self
            .http
            .post(self.url("sendDocument"))
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                TransportError::request(format!("sendDocument: {}", err.without_url()))
            })?;
        Self::unpack::<Value>("sendDocument", response)
            .await
            .map(|_| ())
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        layout: Option<&ButtonLayout>,
    ) -> std::result::Result<(), TransportError> {
        let mut body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": PARSE_MODE,
        });
        if let Some(layout) = layout {
            body["reply_markup"] = reply_markup(layout);
        }
        self.call::<Value>("editMessageText", &body).await.map(|_| ())
    }

    async fn acknowledge_interaction(
        &self,
        interaction_id: &str,
    ) -> std::result::Result<(), TransportError> {
        self.call::<Value>(
            "answerCallbackQuery",
            &json!({ "callback_query_id": interaction_id }),
        )
        .await
        .map(|_| ())
    }
}
