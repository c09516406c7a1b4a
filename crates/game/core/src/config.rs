use std::time::Duration;

/// Game configuration constants and tunable policy parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Fraction of max health required before exploring again.
    pub explore_health_ratio: f64,
    /// Below this health percentage the default rule parks the bot in
    /// `WaitingHealth` instead of idling.
    pub low_health_percent: u32,
    /// Cooldown length used when the game reports an energy shortage without
    /// saying how long the regeneration takes.
    pub default_cooldown_minutes: u32,
    /// Literal command text that triggers one exploration step.
    pub explore_command: String,
    /// Literal command text that makes the game reply with the character sheet.
    pub status_command: String,
    /// Minimum human-like pause before a follow-up command is sent.
    pub min_pacing: Duration,
    /// Upper bound of the randomized pause.
    pub max_pacing: Duration,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_EXPLORE_HEALTH_RATIO: f64 = 0.95;
    pub const DEFAULT_LOW_HEALTH_PERCENT: u32 = 90;
    pub const DEFAULT_COOLDOWN_MINUTES: u32 = 5;
    pub const EXPLORE_COMMAND: &'static str = "🗺️ Досліджувати (⚡1)";
    pub const STATUS_COMMAND: &'static str = "🧍 Персонаж";
    pub const DEFAULT_MIN_PACING: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_PACING: Duration = Duration::from_secs(2);

    pub fn new() -> Self {
        Self {
            explore_health_ratio: Self::DEFAULT_EXPLORE_HEALTH_RATIO,
            low_health_percent: Self::DEFAULT_LOW_HEALTH_PERCENT,
            default_cooldown_minutes: Self::DEFAULT_COOLDOWN_MINUTES,
            explore_command: Self::EXPLORE_COMMAND.to_owned(),
            status_command: Self::STATUS_COMMAND.to_owned(),
            min_pacing: Self::DEFAULT_MIN_PACING,
            max_pacing: Self::DEFAULT_MAX_PACING,
        }
    }

    /// Pacing bounds with `max` never below `min`.
    pub fn pacing_bounds(&self) -> (Duration, Duration) {
        (self.min_pacing, self.max_pacing.max(self.min_pacing))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
