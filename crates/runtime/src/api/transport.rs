//! Chat transport seams.
//!
//! The runtime never talks to a chat network directly. Embedders plug in a
//! [`ChatClient`] for the game chat and, optionally, a separate [`Notifier`]
//! for owner reports; [`ChatNotifier`] reuses the chat client when both go
//! through the same account.
use std::sync::Arc;

use async_trait::async_trait;

use super::errors::TransportError;

/// One inbound chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub chat_id: i64,
    pub text: String,
    /// Sent by the bot's own account (an echo of something we sent).
    pub outgoing: bool,
}

impl ChatMessage {
    pub fn incoming(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            outgoing: false,
        }
    }

    pub fn outgoing(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            outgoing: true,
        }
    }

    pub fn is_command(&self) -> bool {
        self.text.trim_start().starts_with('/')
    }
}

/// Outbound half of the chat transport.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError>;
}

/// Sink for owner-facing reports.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a rendered report to the reporting chat.
    async fn report(&self, chat_id: i64, text: &str) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: ChatClient + ?Sized> ChatClient for Arc<T> {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        (**self).send_text(chat_id, text).await
    }
}

/// Delivers reports as plain chat messages.
pub struct ChatNotifier {
    chat: Arc<dyn ChatClient>,
}

impl ChatNotifier {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Notifier for ChatNotifier {
    async fn report(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        self.chat
            .send_text(chat_id, text)
            .await
            .map_err(|err| match err {
                TransportError::Send { chat_id, message } => {
                    TransportError::Report { chat_id, message }
                }
                other => other,
            })
    }
}
