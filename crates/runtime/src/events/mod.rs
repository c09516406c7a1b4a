//! Topic-based event bus for runtime events.
//!
//! The dispatcher publishes every report decision and every outbound message,
//! so embedders and tests can observe the bot without a notifier.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{OutboundEvent, OutboundKind, ReportEvent, ReportOutcome};
