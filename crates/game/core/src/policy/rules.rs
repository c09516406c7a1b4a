//! Individual policy rules, evaluated in table order by [`super::decide`].
//!
//! Each rule inspects the message facts and the state, pushes intents, and
//! either stops the cascade or lets the next rule run.

use std::time::Instant;

use super::Origin;
use super::intent::{Intent, Report, ReportKind};
use crate::config::GameConfig;
use crate::facts::{ControlCommand, Fact};
use crate::state::{AppliedChange, GameState, LogLevel, PlayState};

/// Fixed reply to `/help`.
pub const HELP_TEXT: &str = "🤖 Available commands:\n\
/start - start automation\n\
/stop - stop automation\n\
/log all - report every action\n\
/log important - report only important actions\n\
/status - show current status\n\
/help - show this help";

/// Substrings that mark error replies and battle dividers; the default rule
/// never reacts to them.
const ERROR_MARKER: &str = "❌";
const DIVIDER_MARKER: &str = "---";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Flow {
    Continue,
    Stop,
}

/// Evaluation context for one message.
pub(super) struct Ctx<'a> {
    pub state: &'a mut GameState,
    pub config: &'a GameConfig,
    pub facts: &'a [Fact],
    pub text: &'a str,
    pub origin: Origin,
    pub chat_id: i64,
    pub now: Instant,
    pub intents: Vec<Intent>,
    pub changes: Vec<AppliedChange>,
}

impl Ctx<'_> {
    fn has(&self, pred: impl Fn(&Fact) -> bool) -> bool {
        self.facts.iter().any(pred)
    }

    fn report(&mut self, report: Report) {
        self.intents.push(Intent::Report(report));
    }

    fn reply(&mut self, text: impl Into<String>) {
        self.intents.push(Intent::Reply {
            chat_id: self.chat_id,
            text: text.into(),
        });
    }

    /// Moves to `to`, reporting the change first when it is real.
    fn transition(&mut self, to: PlayState) {
        let transition = self.state.set_play_state(to);
        if transition.changed {
            self.report(Report::normal(ReportKind::StateChanged {
                from: transition.from,
                to: transition.to,
            }));
        }
    }

    fn explore_if_possible(&mut self) {
        if self.state.can_explore() {
            self.intents.push(Intent::SendExplore {
                delay: self.config.min_pacing,
            });
        }
    }
}

// ----- 1-2. control commands and the running gate -----

pub(super) fn commands(ctx: &mut Ctx<'_>) -> Flow {
    let Some(command) = ctx.facts.iter().find_map(Fact::control_command) else {
        return Flow::Continue;
    };

    match command {
        ControlCommand::Start => {
            let transition = ctx.state.start_bot();
            ctx.reply("✅ Automation started");
            if transition.changed {
                ctx.report(Report::normal(ReportKind::StateChanged {
                    from: transition.from,
                    to: transition.to,
                }));
            }
            ctx.report(Report::important(ReportKind::BotStarted));
        }
        ControlCommand::Stop => {
            let transition = ctx.state.stop_bot();
            ctx.reply("🛑 Automation stopped");
            if transition.changed {
                ctx.report(Report::normal(ReportKind::StateChanged {
                    from: transition.from,
                    to: transition.to,
                }));
            }
            ctx.report(Report::important(ReportKind::BotStopped));
        }
        ControlCommand::LogAll => {
            ctx.state.set_log_level(LogLevel::All);
            ctx.reply("📝 Logging: all actions");
        }
        ControlCommand::LogImportant => {
            ctx.state.set_log_level(LogLevel::ImportantOnly);
            ctx.reply("📝 Logging: important actions only");
        }
        ControlCommand::Status => {
            let status = ctx.state.status_string(ctx.now);
            ctx.reply(status);
        }
        ControlCommand::Help => ctx.reply(HELP_TEXT),
        ControlCommand::Unknown(text) => {
            if ctx.state.is_running() {
                ctx.reply(format!("❓ Unknown command: {text}\nSend /help for the list"));
            }
        }
    }
    Flow::Stop
}

pub(super) fn require_running(ctx: &mut Ctx<'_>) -> Flow {
    if ctx.state.is_running() {
        Flow::Continue
    } else {
        Flow::Stop
    }
}

// ----- vitals (never stops the cascade) -----

pub(super) fn apply_vitals(ctx: &mut Ctx<'_>) -> Flow {
    ctx.state.record_activity(ctx.now);
    let was_waiting_energy = ctx.state.play_state() == PlayState::WaitingEnergy;
    let changes = ctx.state.update_from_facts(ctx.facts, ctx.now);

    for fact in ctx.facts {
        match fact {
            Fact::LevelUp { from, to } => {
                ctx.report(Report::important(ReportKind::LevelUp {
                    from: *from,
                    to: *to,
                }));
            }
            Fact::HealthFullyRestored { .. } => {
                ctx.report(Report::normal(ReportKind::HealthRestored));
            }
            _ => {}
        }
    }
    if was_waiting_energy && changes.contains(&AppliedChange::EnergyWaitCleared) {
        ctx.report(Report::normal(ReportKind::EnergyRestored));
    }

    ctx.changes.extend(changes);
    Flow::Continue
}

// ----- 3. energy exhaustion -----

pub(super) fn energy_shortage(ctx: &mut Ctx<'_>) -> Flow {
    let cooldown = ctx.facts.iter().find_map(|fact| match fact {
        Fact::EnergyCooldown { minutes } => Some(*minutes),
        _ => None,
    });
    let shortage = ctx.has(|fact| matches!(fact, Fact::EnergyShortage { .. }));
    if cooldown.is_none() && !shortage {
        return Flow::Continue;
    }

    let minutes = cooldown.unwrap_or(ctx.config.default_cooldown_minutes);
    let transition = ctx.state.set_energy_wait(minutes, ctx.now);
    if transition.changed {
        ctx.report(Report::normal(ReportKind::StateChanged {
            from: transition.from,
            to: transition.to,
        }));
    }
    ctx.report(Report::normal(ReportKind::NoEnergy { minutes }));
    ctx.intents.push(Intent::StartCooldown { minutes });
    Flow::Stop
}

// ----- 4. battle start -----

pub(super) fn enemy_appeared(ctx: &mut Ctx<'_>) -> Flow {
    let Some(enemy) = ctx.facts.iter().find_map(|fact| match fact {
        Fact::EnemyAppeared { name } => Some(name.clone()),
        _ => None,
    }) else {
        return Flow::Continue;
    };

    ctx.transition(PlayState::InBattle);
    ctx.report(Report::normal(ReportKind::BattleStarted { enemy }));
    Flow::Stop
}

pub(super) fn already_in_battle(ctx: &mut Ctx<'_>) -> Flow {
    if !ctx.has(|fact| matches!(fact, Fact::AlreadyInBattle)) {
        return Flow::Continue;
    }
    ctx.transition(PlayState::InBattle);
    Flow::Stop
}

// ----- 5. battle progress -----

pub(super) fn battle_round(ctx: &mut Ctx<'_>) -> Flow {
    if ctx.has(|fact| matches!(fact, Fact::BattleRoundMarker)) {
        Flow::Stop
    } else {
        Flow::Continue
    }
}

// ----- 6. battle end -----

pub(super) fn battle_victory(ctx: &mut Ctx<'_>) -> Flow {
    if !ctx.has(|fact| matches!(fact, Fact::BattleVictory)) {
        return Flow::Continue;
    }

    let (gold, exp) = ctx
        .facts
        .iter()
        .find_map(|fact| match fact {
            Fact::BattleRewards { gold, exp } => Some((*gold, *exp)),
            _ => None,
        })
        .unwrap_or_default();

    let changes = ctx.state.credit_rewards(gold, exp);
    ctx.changes.extend(changes);
    ctx.transition(PlayState::Exploring);
    ctx.report(Report::important(ReportKind::BattleWon { gold, exp }));
    ctx.explore_if_possible();
    Flow::Stop
}

pub(super) fn battle_defeat(ctx: &mut Ctx<'_>) -> Flow {
    if !ctx.has(|fact| matches!(fact, Fact::BattleDefeat)) {
        return Flow::Continue;
    }
    ctx.transition(PlayState::WaitingHealth);
    ctx.report(Report::important(ReportKind::BattleLost));
    Flow::Stop
}

pub(super) fn battle_ended(ctx: &mut Ctx<'_>) -> Flow {
    if !ctx.has(|fact| matches!(fact, Fact::EnemyFled | Fact::EscapedBattle)) {
        return Flow::Continue;
    }
    ctx.transition(PlayState::Exploring);
    ctx.report(Report::normal(ReportKind::BattleEnded));
    ctx.explore_if_possible();
    Flow::Stop
}

// ----- 7-9. exploration outcomes -----

pub(super) fn exploration(ctx: &mut Ctx<'_>) -> Flow {
    let Some(kind) = ctx.facts.iter().find_map(|fact| match fact {
        Fact::ExplorationEvent { kind } => Some(*kind),
        _ => None,
    }) else {
        return Flow::Continue;
    };

    ctx.report(Report::normal(ReportKind::FoundEvent { kind }));
    ctx.explore_if_possible();
    Flow::Stop
}

pub(super) fn greeting(ctx: &mut Ctx<'_>) -> Flow {
    for fact in ctx.facts {
        match fact {
            Fact::GreetingSent { player } => {
                let player = player.clone();
                ctx.report(Report::normal(ReportKind::Greeted { player }));
                return Flow::Stop;
            }
            Fact::GreetingReceived => return Flow::Stop,
            _ => {}
        }
    }
    Flow::Continue
}

pub(super) fn not_in_battle(ctx: &mut Ctx<'_>) -> Flow {
    if ctx.has(|fact| matches!(fact, Fact::NotInBattle)) {
        Flow::Stop
    } else {
        Flow::Continue
    }
}

pub(super) fn health_too_low(ctx: &mut Ctx<'_>) -> Flow {
    if !ctx.has(|fact| matches!(fact, Fact::HealthTooLow)) {
        return Flow::Continue;
    }
    ctx.transition(PlayState::WaitingHealth);
    ctx.report(Report::normal(ReportKind::LowHealth));
    Flow::Stop
}

// ----- 10. loot (never stops the cascade) -----

pub(super) fn items(ctx: &mut Ctx<'_>) -> Flow {
    let found: Vec<String> = ctx
        .facts
        .iter()
        .filter_map(|fact| match fact {
            Fact::ItemFound { description } => Some(description.clone()),
            _ => None,
        })
        .collect();
    for description in found {
        ctx.report(Report::important(ReportKind::ItemFound { description }));
    }
    Flow::Continue
}

// ----- 11. default -----

pub(super) fn default_action(ctx: &mut Ctx<'_>) -> Flow {
    if ctx.origin != Origin::Game {
        return Flow::Stop;
    }
    if ctx.text.contains(ERROR_MARKER) || ctx.text.contains(DIVIDER_MARKER) {
        return Flow::Stop;
    }

    match ctx.state.play_state() {
        // Only battle start/end facts move the bot out of a battle.
        PlayState::InBattle => return Flow::Stop,
        PlayState::WaitingEnergy if ctx.state.seconds_until_energy(ctx.now).is_some() => {
            return Flow::Stop;
        }
        _ => {}
    }

    if ctx.state.can_explore() {
        ctx.transition(PlayState::Exploring);
        ctx.report(Report::normal(ReportKind::Explored));
        ctx.intents.push(Intent::SendExplore {
            delay: ctx.config.min_pacing,
        });
    } else if ctx.state.health_percent() < ctx.config.low_health_percent {
        ctx.transition(PlayState::WaitingHealth);
        ctx.report(Report::normal(ReportKind::LowHealth));
    }
    Flow::Stop
}
