//! Runtime orchestration for the chat-game bot.
//!
//! This crate wires the pure `game-core` policy to a chat transport. Consumers
//! embed [`Runtime`] with a [`ChatClient`] (and optionally a [`Notifier`]),
//! feed inbound messages, and observe the bot through [`StoreHandle`] and the
//! [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`dispatch`] executes intents against the transport
//! - [`router`] filters and processes inbound messages
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod router;
pub mod runtime;

mod workers;

pub use api::{
    ChatClient, ChatMessage, ChatNotifier, DriverView, Handled, Notifier, ReportContext, Result,
    RuntimeError, StoreHandle, TransportError,
};
pub use clock::{Clock, TokioClock};
pub use config::RuntimeConfig;
pub use dispatch::ActionDispatcher;
pub use events::{
    Event, EventBus, OutboundEvent, OutboundKind, ReportEvent, ReportOutcome, Topic,
};
pub use router::MessageRouter;
pub use runtime::{Runtime, RuntimeBuilder};
