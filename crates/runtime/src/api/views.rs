//! Read-only snapshots handed out by the store worker.
use std::time::Duration;

use game_core::{BotState, Decision, LogLevel, PlayState};

/// What the dispatcher needs to filter and render reports.
///
/// Captured in the same store step as the decision it accompanies, so the
/// rendered status always reflects the state right after that decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportContext {
    pub log_level: LogLevel,
    pub reporting_chat_id: i64,
    pub status: String,
}

/// Result of handling one inbound message.
#[derive(Clone, Debug)]
pub struct Handled {
    pub decision: Decision,
    pub context: ReportContext,
}

/// State summary the game loop driver polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverView {
    pub bot_state: BotState,
    pub play_state: PlayState,
    pub can_explore: bool,
    /// Whole seconds left on a pending cooldown.
    pub seconds_until_energy: Option<u64>,
    /// A cooldown deadline exists and has already passed.
    pub energy_wait_elapsed: bool,
    /// Time since the last game message or bot-initiated command.
    pub idle_for: Option<Duration>,
}

impl DriverView {
    pub fn is_running(&self) -> bool {
        self.bot_state == BotState::Running
    }

    /// No activity for at least `timeout` (or never any activity).
    pub fn stalled(&self, timeout: Duration) -> bool {
        self.idle_for.is_none_or(|idle| idle >= timeout)
    }
}
