//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and the chat transport so callers
//! can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("store worker command channel closed")]
    CommandChannelClosed,

    #[error("store worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("runtime worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("runtime requires a {what} before building")]
    MissingCollaborator { what: &'static str },
}

/// Failure reported by a [`ChatClient`](super::ChatClient) or
/// [`Notifier`](super::Notifier) implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to send message to chat {chat_id}: {message}")]
    Send { chat_id: i64, message: String },

    #[error("failed to deliver report to chat {chat_id}: {message}")]
    Report { chat_id: i64, message: String },

    #[error("chat transport closed")]
    Closed,
}
