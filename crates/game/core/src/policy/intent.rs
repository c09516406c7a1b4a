//! Actions the policy wants performed.

use std::fmt;
use std::time::Duration;

use crate::facts::ExplorationKind;
use crate::state::PlayState;

/// Report priority, filtered against the configured log level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Importance {
    #[default]
    Normal,
    Important,
}

/// What happened, rendered as the first line of a report.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReportKind {
    StateChanged { from: PlayState, to: PlayState },
    NoEnergy { minutes: u32 },
    BattleStarted { enemy: String },
    BattleWon { gold: u32, exp: u32 },
    BattleLost,
    BattleEnded,
    FoundEvent { kind: ExplorationKind },
    Greeted { player: String },
    ItemFound { description: String },
    Explored,
    LowHealth,
    LevelUp { from: u32, to: u32 },
    HealthRestored,
    HealthRecovered,
    EnergyRestored,
    BotStarted,
    BotStopped,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::StateChanged { from, to } => write!(f, "🔄 State: {from} → {to}"),
            ReportKind::NoEnergy { minutes } => {
                write!(f, "🔋 Out of energy, waiting {minutes} minutes")
            }
            ReportKind::BattleStarted { enemy } => write!(f, "⚔️ Battle started: {enemy}"),
            ReportKind::BattleWon { gold, exp } => write!(f, "🏆 Victory! +{gold}💰 +{exp}⭐"),
            ReportKind::BattleLost => f.write_str("☠️ Defeated in battle"),
            ReportKind::BattleEnded => f.write_str("🏃 Battle ended without a winner"),
            ReportKind::FoundEvent { kind } => write!(f, "📍 Event: {}", kind.label()),
            ReportKind::Greeted { player } => write!(f, "👋 Greeted {player}"),
            ReportKind::ItemFound { description } => write!(f, "🎁 Found: {description}"),
            ReportKind::Explored => f.write_str("🗺️ Exploring the world"),
            ReportKind::LowHealth => f.write_str("💔 Health too low, waiting for recovery"),
            ReportKind::LevelUp { from, to } => write!(f, "🎉 LEVEL UP! {from} → {to}"),
            ReportKind::HealthRestored => f.write_str("❤️‍🩹 Health fully restored!"),
            ReportKind::HealthRecovered => {
                f.write_str("💚 Health recovered, resuming exploration")
            }
            ReportKind::EnergyRestored => {
                f.write_str("⚡ Energy restored, resuming exploration")
            }
            ReportKind::BotStarted => f.write_str("🚀 Bot started"),
            ReportKind::BotStopped => f.write_str("🛑 Bot stopped"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    pub kind: ReportKind,
    pub importance: Importance,
}

impl Report {
    pub fn normal(kind: ReportKind) -> Self {
        Self {
            kind,
            importance: Importance::Normal,
        }
    }

    pub fn important(kind: ReportKind) -> Self {
        Self {
            kind,
            importance: Importance::Important,
        }
    }

    pub fn is_important(&self) -> bool {
        self.importance == Importance::Important
    }
}

/// A side effect requested by the policy or the game loop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    /// Send the explore command to the game chat after at least `delay`.
    SendExplore { delay: Duration },
    /// Ask the game for the character sheet after at least `delay`.
    SendStatusCheck { delay: Duration },
    /// An energy cooldown was armed in the state; wake the game loop.
    StartCooldown { minutes: u32 },
    /// Notify the owner, subject to log-level filtering.
    Report(Report),
    /// Answer a control command in the chat it came from.
    Reply { chat_id: i64, text: String },
}

impl Intent {
    pub fn report(&self) -> Option<&Report> {
        match self {
            Intent::Report(report) => Some(report),
            _ => None,
        }
    }
}
