use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod layout;

pub use layout::{Button, ButtonLayout};

/// Hard ceiling the chat protocol puts on a button token.
pub const TOKEN_MAX_CHARS: usize = 64;

pub type ChatId = i64;
pub type MessageId = i64;

/// Inbound event as seen by the core, after the transport stripped its envelope.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    Message {
        chat_id: ChatId,
        user_display_name: String,
        text: String,
    },
    ButtonPress {
        chat_id: ChatId,
        message_id: MessageId,
        interaction_id: String,
        token: String,
    },
}

/// What the core decided to show for one turn.
///
/// `EditText` targets an existing message (category pickers); every other
/// variant produces a new message.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    SendText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layout: Option<ButtonLayout>,
    },
    EditText {
        message_id: MessageId,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layout: Option<ButtonLayout>,
    },
    SendDocument {
        file: PathBuf,
        display_name: String,
        caption: String,
    },
}

impl Reply {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::SendText {
            text: text.into(),
            layout: None,
        }
    }

    #[must_use]
    pub fn with_buttons(text: impl Into<String>, layout: ButtonLayout) -> Self {
        Self::SendText {
            text: text.into(),
            layout: Some(layout),
        }
    }

    #[must_use]
    pub fn layout(&self) -> Option<&ButtonLayout> {
        match self {
            Self::SendText { layout, .. } | Self::EditText { layout, .. } => layout.as_ref(),
            Self::SendDocument { .. } => None,
        }
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::SendText { text, .. } | Self::EditText { text, .. } => Some(text),
            Self::SendDocument { .. } => None,
        }
    }
}

/// Visible UI left behind by a turn. Nothing is stored server-side; this only
/// describes the message the user is now looking at.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UiState {
    #[default]
    Idle,
    ShowingRoot,
    ShowingCategory {
        category: String,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Turn {
    pub reply: Reply,
    pub state: UiState,
}

impl Turn {
    #[must_use]
    pub fn idle(reply: Reply) -> Self {
        Self {
            reply,
            state: UiState::Idle,
        }
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reply_serializes_with_kind_tag() {
        let reply = Reply::text("hello");
        let json = serialize_json(&reply).unwrap();
        assert_eq!(json, r#"{"kind":"send_text","text":"hello"}"#);
    }

    #[test]
    fn inbound_event_roundtrips_through_json() {
        let raw = r#"{"kind":"button_press","chat_id":7,"message_id":42,"interaction_id":"cb-1","token":"back"}"#;
        let event: InboundEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(
            event,
            InboundEvent::ButtonPress {
                chat_id: 7,
                message_id: 42,
                interaction_id: "cb-1".to_string(),
                token: "back".to_string(),
            }
        );
    }

    #[test]
    fn documents_carry_no_layout() {
        let doc = Reply::SendDocument {
            file: PathBuf::from("pdf_files/a.pdf"),
            display_name: "a.pdf".to_string(),
            caption: String::new(),
        };
        assert!(doc.layout().is_none());
        assert!(doc.body().is_none());
    }
}
