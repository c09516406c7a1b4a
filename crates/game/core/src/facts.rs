//! Structured observations extracted from a single raw chat message.
//!
//! Facts carry no behaviour of their own: the extractor produces them, the
//! state applies the vitals-related ones, and the policy reads the rest to
//! pick the next play state.

use crate::state::Meter;

/// Character sheet block ("🧍 Персонаж" reply).
///
/// Each line of the sheet is optional because the game also echoes single
/// lines (e.g. just the health line) in other messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSheet {
    pub name: Option<String>,
    pub level: Option<u32>,
    pub health: Option<Meter>,
    pub energy: Option<Meter>,
    pub gold: Option<u32>,
    pub experience: Option<Meter>,
}

impl CharacterSheet {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.level.is_none()
            && self.health.is_none()
            && self.energy.is_none()
            && self.gold.is_none()
            && self.experience.is_none()
    }
}

/// Kind of exploration encounter, keyed by a distinguishing marker.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ExplorationKind {
    Garden,
    Altar,
    Monument,
    Footprints,
    Runes,
    Echo,
    LuckyCoin,
    MeditationSpot,
    Generic,
}

impl ExplorationKind {
    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            ExplorationKind::Garden => "🐝 Garden",
            ExplorationKind::Altar => "🕯️ Altar",
            ExplorationKind::Monument => "🗿 Monument",
            ExplorationKind::Footprints => "👣 Footprints",
            ExplorationKind::Runes => "📖 Runes",
            ExplorationKind::Echo => "🔔 Echo",
            ExplorationKind::LuckyCoin => "🪙 Lucky coin",
            ExplorationKind::MeditationSpot => "🧘 Meditation spot",
            ExplorationKind::Generic => "🔍 Something interesting",
        }
    }
}

/// Control commands accepted from the owner.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlCommand {
    Start,
    Stop,
    LogAll,
    LogImportant,
    Status,
    Help,
    /// Anything else starting with `/`; carries the trimmed original text.
    Unknown(String),
}

impl ControlCommand {
    /// Parses a command from its verb and argument string.
    ///
    /// Matching is case-insensitive and exact: the message is trimmed as a
    /// whole, but `args` is compared as given, so `/log  all` (two spaces)
    /// and `/start now` are both unknown.
    pub fn parse(verb: &str, args: &str) -> Self {
        let verb = verb.trim().to_lowercase();
        let args = args.to_lowercase();
        match (verb.as_str(), args.as_str()) {
            ("/start", "") => ControlCommand::Start,
            ("/stop", "") => ControlCommand::Stop,
            ("/log", "all") => ControlCommand::LogAll,
            ("/log", "important") => ControlCommand::LogImportant,
            ("/status", "") => ControlCommand::Status,
            ("/help", "") => ControlCommand::Help,
            _ => {
                let text = if args.is_empty() {
                    verb
                } else {
                    format!("{verb} {args}")
                };
                ControlCommand::Unknown(text)
            }
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ControlCommand::Unknown(_))
    }
}

/// A structured observation extracted from one raw chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fact {
    // ----- character sheet -----
    CharacterInfo(CharacterSheet),

    // ----- health -----
    HealthFullyRestored { max: u32 },
    /// Battle round marker line "👤 Ви (cur/max)".
    HealthSnapshot { current: u32, max: u32 },
    HealthDamage { amount: u32 },
    HealthPotionUsed { restored: u32, is_large: bool },
    HealthGainEvent { amount: u32 },
    /// The game refused an action because health is too low.
    HealthTooLow,

    // ----- energy -----
    EnergyShortage { current: u32, max: u32 },
    EnergyPotionUsed { restored: u32 },
    EnergyGainEvent { amount: u32 },
    EnergyCooldown { minutes: u32 },

    // ----- progression -----
    LevelUp { from: u32, to: u32 },
    MaxHealthIncrease { amount: u32 },

    // ----- battle -----
    BattleRewards { gold: u32, exp: u32 },
    EnemyAppeared { name: String },
    BattleRoundMarker,
    BattleVictory,
    BattleDefeat,
    EnemyFled,
    EscapedBattle,
    AlreadyInBattle,
    NotInBattle,

    // ----- exploration -----
    ExplorationEvent { kind: ExplorationKind },
    GreetingSent { player: String },
    GreetingReceived,
    ItemFound { description: String },

    // ----- control -----
    CommandReceived { verb: String, args: String },
}

impl Fact {
    /// Parsed control command, if this fact is a command.
    pub fn control_command(&self) -> Option<ControlCommand> {
        match self {
            Fact::CommandReceived { verb, args } => Some(ControlCommand::parse(verb, args)),
            _ => None,
        }
    }

    /// Facts that mutate vitals or economy counters when applied to the state.
    ///
    /// `BattleRewards` is excluded: rewards are only credited together with
    /// a victory, by the battle rule.
    pub fn is_vitals(&self) -> bool {
        matches!(
            self,
            Fact::CharacterInfo(_)
                | Fact::HealthFullyRestored { .. }
                | Fact::HealthSnapshot { .. }
                | Fact::HealthDamage { .. }
                | Fact::HealthPotionUsed { .. }
                | Fact::HealthGainEvent { .. }
                | Fact::EnergyShortage { .. }
                | Fact::EnergyPotionUsed { .. }
                | Fact::EnergyGainEvent { .. }
                | Fact::EnergyCooldown { .. }
                | Fact::LevelUp { .. }
                | Fact::MaxHealthIncrease { .. }
        )
    }
}
