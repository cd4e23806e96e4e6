//! In-memory [`Transport`] that records calls, for tests and offline tools.

use crate::error::TransportError;
use crate::transport::Transport;
use async_trait::async_trait;
use kb_protocol::{ButtonLayout, ChatId, MessageId};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Text {
        chat_id: ChatId,
        text: String,
        layout: Option<ButtonLayout>,
    },
    Document {
        chat_id: ChatId,
        file: PathBuf,
        display_name: String,
        caption: String,
    },
    Edit {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        layout: Option<ButtonLayout>,
    },
    Acknowledge {
        interaction_id: String,
    },
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every call but reports each one as failed.
    pub fn failing() -> Self {
        Self {
            calls: Mutex::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn acknowledgements(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, TransportCall::Acknowledge { .. }))
            .count()
    }

    fn record(&self, call: TransportCall) -> Result<(), TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.fail {
            return Err(TransportError::request("recording transport set to fail"));
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn deliver_text(
        &self,
        chat_id: ChatId,
        text: &str,
        layout: Option<&ButtonLayout>,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::Text {
            chat_id,
            text: text.to_string(),
            layout: layout.cloned(),
        })
    }

    async fn deliver_document(
        &self,
        chat_id: ChatId,
        file: &Path,
        display_name: &str,
        caption: &str,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::Document {
            chat_id,
            file: file.to_path_buf(),
            display_name: display_name.to_string(),
            caption: caption.to_string(),
        })
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        layout: Option<&ButtonLayout>,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            layout: layout.cloned(),
        })
    }

    async fn acknowledge_interaction(&self, interaction_id: &str) -> Result<(), TransportError> {
        self.record(TransportCall::Acknowledge {
            interaction_id: interaction_id.to_string(),
        })
    }
}
