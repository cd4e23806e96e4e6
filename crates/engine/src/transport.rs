use crate::error::TransportError;
use async_trait::async_trait;
use kb_protocol::{ButtonLayout, ChatId, MessageId};
use std::path::Path;

/// Outbound side of the chat API, as the core needs it.
///
/// Every call is fire-and-forget from the engine's point of view: an `Err`
/// is logged and the turn ends.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a new HTML message, optionally with inline buttons.
    async fn deliver_text(
        &self,
        chat_id: ChatId,
        text: &str,
        layout: Option<&ButtonLayout>,
    ) -> Result<(), TransportError>;

    async fn deliver_document(
        &self,
        chat_id: ChatId,
        file: &Path,
        display_name: &str,
        caption: &str,
    ) -> Result<(), TransportError>;

    /// Replace text and buttons of a message sent earlier.
    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        layout: Option<&ButtonLayout>,
    ) -> Result<(), TransportError>;

    /// Stop the client-side spinner of a pressed button.
    async fn acknowledge_interaction(&self, interaction_id: &str) -> Result<(), TransportError>;
}
