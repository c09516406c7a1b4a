//! Worker tasks that back the runtime orchestration.
//!
//! The store worker serializes every access to the game state, while the
//! driver keeps the game loop moving between inbound messages.

mod driver;
mod store;

pub use driver::GameLoopDriver;
pub use store::{Command, StoreWorker};
