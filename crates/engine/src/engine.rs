use crate::error::{EngineError, Result};
use crate::machine::{Planned, Planner};
use crate::transport::Transport;
use kb_catalog::KnowledgeBase;
use kb_protocol::{ChatId, InboundEvent, MessageId, Reply};
use std::path::PathBuf;
use std::sync::Arc;

/// Plans a turn and carries it out through a [`Transport`].
///
/// Holds no per-chat state: everything a button press needs is in its token.
pub struct Engine<T> {
    planner: Planner,
    transport: T,
}

impl<T: Transport> Engine<T> {
    pub fn new(kb: Arc<KnowledgeBase>, documents_dir: impl Into<PathBuf>, transport: T) -> Self {
        Self {
            planner: Planner::new(kb, documents_dir),
            transport,
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Handle a text message. Returns the reply that was attempted.
    pub async fn on_message(&self, chat_id: ChatId, user_display_name: &str, text: &str) -> Reply {
        let planned = self.planner.plan_message(user_display_name, text);
        self.finish(chat_id, planned).await
    }

    /// Handle a button press. The interaction is acknowledged before dispatch,
    /// whatever the token turns out to be.
    pub async fn on_button_press(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        interaction_id: &str,
        token: &str,
    ) -> Reply {
        if let Err(err) = self.transport.acknowledge_interaction(interaction_id).await {
            log::warn!("chat {chat_id}: acknowledge {interaction_id} failed: {err}");
        }
        let planned = self.planner.plan_button(message_id, token);
        self.finish(chat_id, planned).await
    }

    pub async fn on_event(&self, event: &InboundEvent) -> Reply {
        match event {
            InboundEvent::Message {
                chat_id,
                user_display_name,
                text,
            } => self.on_message(*chat_id, user_display_name, text).await,
            InboundEvent::ButtonPress {
                chat_id,
                message_id,
                interaction_id,
                token,
            } => {
                self.on_button_press(*chat_id, *message_id, interaction_id, token)
                    .await
            }
        }
    }

    async fn finish(&self, chat_id: ChatId, planned: Planned) -> Reply {
        if let Some(usage) = &planned.usage {
            log::info!("chat {chat_id}: {usage}");
        }
        log::debug!("chat {chat_id}: state -> {:?}", planned.turn.state);
        let reply = planned.turn.reply;
        if let Err(err) = self.execute(chat_id, &reply).await {
            log::warn!("chat {chat_id}: delivery not confirmed: {err}");
        }
        reply
    }

    async fn execute(&self, chat_id: ChatId, reply: &Reply) -> Result<()> {
        if let Some(layout) = reply.layout() {
            layout
                .validate()
                .map_err(|err| EngineError::InvalidLayout(format!("{err:#}")))?;
        }
        match reply {
            Reply::SendText { text, layout } => {
                self.transport
                    .deliver_text(chat_id, text, layout.as_ref())
                    .await?
            }
            Reply::EditText {
                message_id,
                text,
                layout,
            } => {
                self.transport
                    .edit_text(chat_id, *message_id, text, layout.as_ref())
                    .await?
            }
            Reply::SendDocument {
                file,
                display_name,
                caption,
            } => {
                self.transport
                    .deliver_document(chat_id, file, display_name, caption)
                    .await?
            }
        }
        Ok(())
    }
}

/// Log an event the transport could not turn into an [`InboundEvent`].
pub fn report_malformed(err: &EngineError) {
    log::warn!("dropping update: {err}");
}
