//! Session state tracked for the running bot.
//!
//! [`GameState`] is a plain, synchronous record. It enforces the vitals
//! invariants (`0 <= current <= max`) and the play-state invariants on every
//! mutation, but it does not serialize access itself: the runtime owns the
//! single instance inside its store worker.
mod meter;
mod status;

use std::time::{Duration, Instant};

pub use meter::Meter;

use crate::config::GameConfig;
use crate::facts::{CharacterSheet, Fact};

/// Lifecycle of the automation itself.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BotState {
    #[default]
    Stopped,
    Running,
}

/// Current game-activity phase.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PlayState {
    #[default]
    Idle,
    Exploring,
    InBattle,
    WaitingEnergy,
    WaitingHealth,
}

/// Report filtering level.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum LogLevel {
    #[default]
    #[strum(to_string = "all")]
    All,
    #[strum(to_string = "important", serialize = "important_only")]
    ImportantOnly,
}

/// Outcome of a play-state assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub changed: bool,
    pub from: PlayState,
    pub to: PlayState,
}

/// A single observable change produced by applying a fact.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppliedChange {
    Name { after: String },
    Level { before: u32, after: u32 },
    Health { before: Meter, after: Meter },
    Energy { before: Meter, after: Meter },
    Experience { before: Meter, after: Meter },
    Gold { before: u32, after: u32 },
    EnergyWaitArmed { minutes: u32 },
    EnergyWaitCleared,
}

#[derive(Clone, Debug)]
pub struct GameState {
    name: String,
    level: u32,
    gold: u32,
    health: Meter,
    energy: Meter,
    experience: Meter,

    bot_state: BotState,
    play_state: PlayState,
    log_level: LogLevel,
    energy_wait_until: Option<Instant>,
    reporting_chat_id: i64,

    explore_health_ratio: f64,
    last_activity: Option<Instant>,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            name: "Unknown".to_owned(),
            level: 0,
            gold: 0,
            health: Meter::default(),
            energy: Meter::default(),
            experience: Meter::default(),
            bot_state: BotState::Stopped,
            play_state: PlayState::Idle,
            log_level: LogLevel::All,
            energy_wait_until: None,
            reporting_chat_id: 0,
            explore_health_ratio: config.explore_health_ratio,
            last_activity: None,
        }
    }

    // ===== accessors =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn health(&self) -> Meter {
        self.health
    }

    pub fn energy(&self) -> Meter {
        self.energy
    }

    pub fn experience(&self) -> Meter {
        self.experience
    }

    pub fn bot_state(&self) -> BotState {
        self.bot_state
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn energy_wait_until(&self) -> Option<Instant> {
        self.energy_wait_until
    }

    pub fn reporting_chat_id(&self) -> i64 {
        self.reporting_chat_id
    }

    pub fn is_running(&self) -> bool {
        self.bot_state == BotState::Running
    }

    pub fn health_percent(&self) -> u32 {
        self.health.percent()
    }

    // ===== lifecycle =====

    /// `/start`: bot becomes running and play state resets to `Idle`.
    pub fn start_bot(&mut self) -> Transition {
        self.bot_state = BotState::Running;
        self.set_play_state(PlayState::Idle)
    }

    /// `/stop`: bot becomes stopped and play state resets to `Idle`.
    pub fn stop_bot(&mut self) -> Transition {
        self.bot_state = BotState::Stopped;
        self.set_play_state(PlayState::Idle)
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.log_level = level;
    }

    pub fn set_reporting_chat(&mut self, chat_id: i64) {
        self.reporting_chat_id = chat_id;
    }

    /// Assigns the play state.
    ///
    /// Leaving `WaitingEnergy` always clears the pending cooldown.
    pub fn set_play_state(&mut self, to: PlayState) -> Transition {
        let from = self.play_state;
        if from == to {
            return Transition {
                changed: false,
                from,
                to,
            };
        }

        if from == PlayState::WaitingEnergy {
            self.energy_wait_until = None;
        }
        self.play_state = to;
        tracing::info!(target: "game_core::state", %from, %to, "play state changed");

        Transition {
            changed: true,
            from,
            to,
        }
    }

    // ===== energy cooldown =====

    /// Starts an energy cooldown: energy drops to zero, the play state moves
    /// to `WaitingEnergy`, and the wait deadline is armed.
    pub fn set_energy_wait(&mut self, minutes: u32, now: Instant) -> Transition {
        let transition = self.set_play_state(PlayState::WaitingEnergy);
        self.energy.set_current(0);
        self.energy_wait_until = Some(now + Duration::from_secs(u64::from(minutes) * 60));
        transition
    }

    pub fn clear_energy_wait(&mut self) -> bool {
        self.energy_wait_until.take().is_some()
    }

    /// Seconds left on the cooldown, rounded up, or `None` when no cooldown
    /// is pending or it has already elapsed.
    pub fn seconds_until_energy(&self, now: Instant) -> Option<u64> {
        let until = self.energy_wait_until?;
        let remaining = until.saturating_duration_since(now);
        if remaining.is_zero() {
            return None;
        }
        Some(remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0))
    }

    /// Detects an elapsed cooldown.
    ///
    /// Clears the deadline and assumes at least one point of energy has
    /// regenerated. Returns `true` only on the call that observes expiry.
    pub fn expire_energy_wait(&mut self, now: Instant) -> bool {
        match self.energy_wait_until {
            Some(until) if now >= until => {
                self.energy_wait_until = None;
                let current = self.energy.current.max(1);
                self.energy.set_current(current);
                true
            }
            _ => false,
        }
    }

    // ===== decisions =====

    /// Near-full health, some energy, not fighting, and the bot is running.
    pub fn can_explore(&self) -> bool {
        self.health.at_least(self.explore_health_ratio)
            && self.energy.current > 0
            && self.play_state != PlayState::InBattle
            && self.bot_state == BotState::Running
    }

    // ===== activity tracking =====

    pub fn record_activity(&mut self, now: Instant) {
        self.last_activity = Some(now);
    }

    /// Time since the last processed game message, `None` if none yet.
    pub fn idle_for(&self, now: Instant) -> Option<Duration> {
        self.last_activity
            .map(|last| now.saturating_duration_since(last))
    }

    // ===== fact application =====

    /// Applies every vitals fact in message order.
    pub fn update_from_facts(&mut self, facts: &[Fact], now: Instant) -> Vec<AppliedChange> {
        let mut changes = Vec::new();
        for fact in facts.iter().filter(|fact| fact.is_vitals()) {
            self.apply_fact(fact, now, &mut changes);
        }
        changes
    }

    /// Credits battle rewards.
    pub fn credit_rewards(&mut self, gold: u32, exp: u32) -> Vec<AppliedChange> {
        let mut changes = Vec::new();

        let before = self.gold;
        self.gold = self.gold.saturating_add(gold);
        if before != self.gold {
            changes.push(AppliedChange::Gold {
                before,
                after: self.gold,
            });
        }

        let before = self.experience;
        self.experience.add(exp);
        if before != self.experience {
            changes.push(AppliedChange::Experience {
                before,
                after: self.experience,
            });
        }

        changes
    }

    fn apply_fact(&mut self, fact: &Fact, now: Instant, changes: &mut Vec<AppliedChange>) {
        let health_before = self.health;
        let energy_before = self.energy;

        match fact {
            Fact::CharacterInfo(sheet) => self.apply_sheet(sheet, changes),
            Fact::HealthFullyRestored { max } => {
                self.health.set(*max, *max);
            }
            Fact::HealthSnapshot { current, max } => {
                self.health.set(*current, *max);
            }
            Fact::HealthDamage { amount } => self.health.sub(*amount),
            Fact::HealthPotionUsed { restored, .. } => self.health.add(*restored),
            Fact::HealthGainEvent { amount } => self.health.add(*amount),
            Fact::EnergyShortage { current, max } => {
                self.energy.set(*current, *max);
            }
            Fact::EnergyPotionUsed { restored } => {
                self.energy.add(*restored);
                if self.clear_energy_wait() {
                    changes.push(AppliedChange::EnergyWaitCleared);
                }
            }
            Fact::EnergyGainEvent { amount } => {
                self.energy.add(*amount);
                if self.clear_energy_wait() {
                    changes.push(AppliedChange::EnergyWaitCleared);
                }
            }
            Fact::EnergyCooldown { minutes } => {
                self.energy.set_current(0);
                self.energy_wait_until =
                    Some(now + Duration::from_secs(u64::from(*minutes) * 60));
                changes.push(AppliedChange::EnergyWaitArmed { minutes: *minutes });
            }
            Fact::LevelUp { to, .. } => {
                let before = self.level;
                self.level = *to;
                if before != self.level {
                    changes.push(AppliedChange::Level {
                        before,
                        after: self.level,
                    });
                }
            }
            Fact::MaxHealthIncrease { amount } => self.health.grow_and_fill(*amount),
            _ => {}
        }

        if health_before != self.health {
            tracing::debug!(
                target: "game_core::state",
                before = %health_before,
                after = %self.health,
                "health updated"
            );
            changes.push(AppliedChange::Health {
                before: health_before,
                after: self.health,
            });
        }
        if energy_before != self.energy {
            tracing::debug!(
                target: "game_core::state",
                before = %energy_before,
                after = %self.energy,
                "energy updated"
            );
            changes.push(AppliedChange::Energy {
                before: energy_before,
                after: self.energy,
            });
        }
    }

    // Health and energy diffs are recorded by the caller.
    fn apply_sheet(&mut self, sheet: &CharacterSheet, changes: &mut Vec<AppliedChange>) {
        if let Some(name) = &sheet.name
            && *name != self.name
        {
            self.name = name.clone();
            changes.push(AppliedChange::Name {
                after: self.name.clone(),
            });
        }
        if let Some(level) = sheet.level
            && level != self.level
        {
            changes.push(AppliedChange::Level {
                before: self.level,
                after: level,
            });
            self.level = level;
        }
        if let Some(health) = sheet.health {
            self.health.set(health.current, health.max);
        }
        if let Some(energy) = sheet.energy {
            self.energy.set(energy.current, energy.max);
        }
        if let Some(gold) = sheet.gold
            && gold != self.gold
        {
            changes.push(AppliedChange::Gold {
                before: self.gold,
                after: gold,
            });
            self.gold = gold;
        }
        if let Some(experience) = sheet.experience {
            let before = self.experience;
            self.experience.set(experience.current, experience.max);
            if before != self.experience {
                changes.push(AppliedChange::Experience {
                    before,
                    after: self.experience,
                });
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Fact {
        Fact::CharacterInfo(CharacterSheet {
            name: Some("Karl Shinobi".into()),
            level: Some(8),
            health: Some(Meter::new(233, 307)),
            energy: Some(Meter::new(2, 10)),
            gold: Some(277),
            experience: Some(Meter::new(393, 1500)),
        })
    }

    fn running() -> GameState {
        let mut state = GameState::new();
        state.start_bot();
        state
    }

    #[test]
    fn character_info_is_idempotent() {
        let now = Instant::now();
        let mut once = GameState::new();
        once.update_from_facts(&[sheet()], now);

        let mut twice = GameState::new();
        twice.update_from_facts(&[sheet()], now);
        let second = twice.update_from_facts(&[sheet()], now);

        assert!(second.is_empty());
        assert_eq!(once.health(), twice.health());
        assert_eq!(once.energy(), twice.energy());
        assert_eq!(once.experience(), twice.experience());
        assert_eq!(once.gold(), twice.gold());
        assert_eq!(once.level(), twice.level());
        assert_eq!(once.name(), twice.name());
    }

    #[test]
    fn oversized_snapshot_is_clamped() {
        let mut state = GameState::new();
        state.update_from_facts(
            &[Fact::HealthSnapshot {
                current: 400,
                max: 307,
            }],
            Instant::now(),
        );
        assert_eq!(state.health(), Meter::new(307, 307));
    }

    #[test]
    fn damage_never_underflows() {
        let now = Instant::now();
        let mut state = GameState::new();
        state.update_from_facts(&[sheet()], now);
        state.update_from_facts(&[Fact::HealthDamage { amount: 10_000 }], now);
        assert_eq!(state.health().current, 0);
    }

    #[test]
    fn level_up_then_max_health_increase_refills() {
        let now = Instant::now();
        let mut state = GameState::new();
        state.update_from_facts(&[sheet()], now);
        state.update_from_facts(
            &[
                Fact::LevelUp { from: 8, to: 9 },
                Fact::MaxHealthIncrease { amount: 20 },
            ],
            now,
        );
        assert_eq!(state.level(), 9);
        assert_eq!(state.health(), Meter::new(327, 327));
    }

    #[test]
    fn set_play_state_reports_only_real_changes() {
        let mut state = running();
        let first = state.set_play_state(PlayState::Exploring);
        let second = state.set_play_state(PlayState::Exploring);
        assert!(first.changed);
        assert_eq!((first.from, first.to), (PlayState::Idle, PlayState::Exploring));
        assert!(!second.changed);
    }

    #[test]
    fn leaving_waiting_energy_clears_deadline() {
        let now = Instant::now();
        let mut state = running();
        state.set_energy_wait(5, now);
        assert_eq!(state.play_state(), PlayState::WaitingEnergy);
        assert_eq!(state.seconds_until_energy(now), Some(300));

        state.set_play_state(PlayState::Exploring);
        assert!(state.energy_wait_until().is_none());
    }

    #[test]
    fn energy_gain_clears_cooldown() {
        let now = Instant::now();
        let mut state = running();
        state.update_from_facts(&[sheet()], now);
        state.set_energy_wait(5, now);

        let changes =
            state.update_from_facts(&[Fact::EnergyPotionUsed { restored: 5 }], now);
        assert!(changes.contains(&AppliedChange::EnergyWaitCleared));
        assert_eq!(state.energy().current, 5);
        assert!(state.seconds_until_energy(now).is_none());
    }

    #[test]
    fn expired_cooldown_grants_one_energy() {
        let now = Instant::now();
        let mut state = running();
        state.update_from_facts(&[sheet()], now);
        state.set_energy_wait(1, now);

        assert!(!state.expire_energy_wait(now + Duration::from_secs(30)));
        assert!(state.expire_energy_wait(now + Duration::from_secs(61)));
        assert_eq!(state.energy().current, 1);
        assert!(!state.expire_energy_wait(now + Duration::from_secs(62)));
    }

    #[test]
    fn stopped_bot_never_explores() {
        let mut state = GameState::new();
        state.update_from_facts(
            &[Fact::CharacterInfo(CharacterSheet {
                health: Some(Meter::new(100, 100)),
                energy: Some(Meter::new(10, 10)),
                ..CharacterSheet::default()
            })],
            Instant::now(),
        );
        assert!(!state.can_explore());
        state.start_bot();
        assert!(state.can_explore());
        state.stop_bot();
        assert!(!state.can_explore());
    }

    #[test]
    fn rewards_clamp_experience() {
        let mut state = GameState::new();
        state.update_from_facts(&[sheet()], Instant::now());
        state.credit_rewards(8, 2_000);
        assert_eq!(state.gold(), 285);
        assert_eq!(state.experience(), Meter::new(1500, 1500));
    }

    #[test]
    fn log_level_parses_both_spellings() {
        assert_eq!("important".parse::<LogLevel>(), Ok(LogLevel::ImportantOnly));
        assert_eq!("ALL".parse::<LogLevel>(), Ok(LogLevel::All));
        assert_eq!(PlayState::WaitingEnergy.to_string(), "waiting_energy");
    }
}
