//! Event types for different topics.

use game_core::Report;
use serde::{Deserialize, Serialize};

/// What happened to a report intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportOutcome {
    /// Forwarded to the notifier successfully.
    Delivered,
    /// Dropped by the `important` log level.
    Filtered,
    /// The notifier returned an error; it was logged and swallowed.
    Failed,
}

/// A report decision made by the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEvent {
    pub report: Report,
    /// Rendered text (`"<action>\n\n<status>"`), empty when filtered.
    pub text: String,
    pub outcome: ReportOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundKind {
    Explore,
    StatusCheck,
    Reply,
}

/// A message the bot sent (or tried to send) to a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub chat_id: i64,
    pub text: String,
    pub kind: OutboundKind,
    /// `false` when the transport failed or the send was cancelled by `/stop`.
    pub sent: bool,
}
