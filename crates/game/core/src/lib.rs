//! Deterministic game logic for the chat-game bot.
//!
//! `game-core` owns the pure parts of the bot: pattern extraction from raw
//! game text ([`extract`]), the session record ([`GameState`]), and the
//! play-state machine ([`policy::decide`]) that turns each message into
//! intents. Nothing here performs I/O or reads the clock; callers pass `now`
//! explicitly so the runtime and tests control time.
pub mod config;
pub mod extract;
pub mod facts;
pub mod policy;
pub mod state;

pub use config::GameConfig;
pub use extract::extract;
pub use facts::{CharacterSheet, ControlCommand, ExplorationKind, Fact};
pub use policy::{
    Decision, Importance, Intent, Origin, Report, ReportKind, decide, decide_facts, decide_from,
};
pub use state::{AppliedChange, BotState, GameState, LogLevel, Meter, PlayState, Transition};
