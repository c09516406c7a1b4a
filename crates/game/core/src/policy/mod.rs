//! Play-state machine.
//!
//! [`decide`] turns one inbound message into state mutations and a list of
//! [`Intent`]s. The decision is an ordered rule table: each rule either stops
//! the cascade for this message or lets the next rule run, so every rule can
//! be tested on its own and the priority order stays auditable in one place.
//!
//! The policy is synchronous and deterministic. Timing lives in the intents
//! (minimum pacing delays, cooldown minutes); executing them is the runtime's
//! job.
mod intent;
mod rules;

use std::time::Instant;

pub use intent::{Importance, Intent, Report, ReportKind};
pub use rules::HELP_TEXT;

use rules::{Ctx, Flow};

use crate::config::GameConfig;
use crate::extract::extract;
use crate::facts::Fact;
use crate::state::{AppliedChange, GameState};

/// A named policy rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    apply: fn(&mut Ctx<'_>) -> Flow,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Rules in priority order; the first one to stop wins.
pub const RULES: &[Rule] = &[
    Rule { name: "commands", apply: rules::commands },
    Rule { name: "require_running", apply: rules::require_running },
    Rule { name: "apply_vitals", apply: rules::apply_vitals },
    Rule { name: "energy_shortage", apply: rules::energy_shortage },
    Rule { name: "enemy_appeared", apply: rules::enemy_appeared },
    Rule { name: "already_in_battle", apply: rules::already_in_battle },
    Rule { name: "battle_round", apply: rules::battle_round },
    Rule { name: "battle_victory", apply: rules::battle_victory },
    Rule { name: "battle_defeat", apply: rules::battle_defeat },
    Rule { name: "battle_ended", apply: rules::battle_ended },
    Rule { name: "exploration", apply: rules::exploration },
    Rule { name: "greeting", apply: rules::greeting },
    Rule { name: "not_in_battle", apply: rules::not_in_battle },
    Rule { name: "health_too_low", apply: rules::health_too_low },
    Rule { name: "items", apply: rules::items },
    Rule { name: "default", apply: rules::default_action },
];

/// Everything one message produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decision {
    pub facts: Vec<Fact>,
    pub changes: Vec<AppliedChange>,
    pub intents: Vec<Intent>,
    /// Name of the rule that ended the cascade, if any did.
    pub rule: Option<&'static str>,
}

impl Decision {
    pub fn reports(&self) -> impl Iterator<Item = &Report> {
        self.intents.iter().filter_map(Intent::report)
    }
}

/// Which chat a message arrived from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Origin {
    /// The game bot's own chat; the only origin that drives exploration.
    #[default]
    Game,
    /// Guild chat: vitals and events are tracked, but plain chatter never
    /// triggers the default explore step.
    Guild,
    /// The owner's reporting chat (control commands only).
    Owner,
}

/// Extracts facts from a game-chat message and runs them through the rule
/// table.
pub fn decide(
    state: &mut GameState,
    chat_id: i64,
    text: &str,
    config: &GameConfig,
    now: Instant,
) -> Decision {
    decide_from(state, Origin::Game, chat_id, text, config, now)
}

/// Like [`decide`], for a message from any [`Origin`].
pub fn decide_from(
    state: &mut GameState,
    origin: Origin,
    chat_id: i64,
    text: &str,
    config: &GameConfig,
    now: Instant,
) -> Decision {
    let facts = extract(text);
    run_rules(state, origin, chat_id, text, facts, config, now)
}

/// Runs already-extracted game-chat facts through the rule table.
pub fn decide_facts(
    state: &mut GameState,
    chat_id: i64,
    text: &str,
    facts: Vec<Fact>,
    config: &GameConfig,
    now: Instant,
) -> Decision {
    run_rules(state, Origin::Game, chat_id, text, facts, config, now)
}

fn run_rules(
    state: &mut GameState,
    origin: Origin,
    chat_id: i64,
    text: &str,
    facts: Vec<Fact>,
    config: &GameConfig,
    now: Instant,
) -> Decision {
    let mut ctx = Ctx {
        state,
        config,
        facts: &facts,
        text,
        origin,
        chat_id,
        now,
        intents: Vec::new(),
        changes: Vec::new(),
    };

    let mut stopped_by = None;
    for rule in RULES {
        if (rule.apply)(&mut ctx) == Flow::Stop {
            stopped_by = Some(rule.name);
            break;
        }
    }

    tracing::debug!(
        target: "game_core::policy",
        %origin,
        facts = facts.len(),
        intents = ctx.intents.len(),
        rule = stopped_by.unwrap_or("none"),
        "message decided"
    );

    let Ctx {
        intents, changes, ..
    } = ctx;
    Decision {
        facts,
        changes,
        intents,
        rule: stopped_by,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::facts::ExplorationKind;
    use crate::state::{Meter, PlayState};

    const GAME: i64 = -100;

    fn running() -> (GameState, GameConfig, Instant) {
        let config = GameConfig::default();
        let mut state = GameState::with_config(&config);
        let now = Instant::now();
        decide(&mut state, GAME, "/start", &config, now);
        // Full health, some energy.
        decide(
            &mut state,
            GAME,
            "❤️ Здоров'я: 300/300\n⚡ Енергія: 5/10\n✨ Досвід: 100/1500",
            &config,
            now,
        );
        state.set_play_state(PlayState::Idle);
        (state, config, now)
    }

    fn kinds(decision: &Decision) -> Vec<ReportKind> {
        decision.reports().map(|report| report.kind.clone()).collect()
    }

    fn explores(decision: &Decision) -> bool {
        decision
            .intents
            .iter()
            .any(|intent| matches!(intent, Intent::SendExplore { .. }))
    }

    #[test]
    fn rule_table_order() {
        let names: Vec<_> = RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(names.first(), Some(&"commands"));
        assert_eq!(names.last(), Some(&"default"));
        let position = |name| names.iter().position(|n| *n == name);
        assert!(position("energy_shortage") < position("enemy_appeared"));
        assert!(position("battle_victory") < position("exploration"));
        assert!(position("items") < position("default"));
    }

    #[test]
    fn stopped_bot_ignores_game_text() {
        let config = GameConfig::default();
        let mut state = GameState::with_config(&config);
        let decision = decide(
            &mut state,
            GAME,
            "❤️ Здоров'я: 233/307",
            &config,
            Instant::now(),
        );
        assert!(decision.intents.is_empty());
        assert!(decision.changes.is_empty());
        assert_eq!(state.health(), Meter::default());
        assert_eq!(decision.rule, Some("require_running"));
    }

    #[test]
    fn stopped_bot_ignores_unknown_command() {
        let config = GameConfig::default();
        let mut state = GameState::with_config(&config);
        let decision = decide(&mut state, GAME, "/dance", &config, Instant::now());
        assert!(decision.intents.is_empty());
    }

    #[test]
    fn start_and_stop_commands() {
        let config = GameConfig::default();
        let mut state = GameState::with_config(&config);
        let now = Instant::now();

        let decision = decide(&mut state, 7, "/START", &config, now);
        assert!(state.is_running());
        assert_eq!(
            decision.intents[0],
            Intent::Reply {
                chat_id: 7,
                text: "✅ Automation started".into()
            }
        );
        assert_eq!(kinds(&decision), vec![ReportKind::BotStarted]);

        state.set_play_state(PlayState::Exploring);
        let decision = decide(&mut state, 7, "  /stop  ", &config, now);
        assert!(!state.is_running());
        assert_eq!(state.play_state(), PlayState::Idle);
        assert_eq!(
            kinds(&decision),
            vec![
                ReportKind::StateChanged {
                    from: PlayState::Exploring,
                    to: PlayState::Idle
                },
                ReportKind::BotStopped
            ]
        );
    }

    #[test]
    fn help_and_unknown_replies() {
        let (mut state, config, now) = running();
        let decision = decide(&mut state, 5, "/help", &config, now);
        assert_eq!(
            decision.intents,
            vec![Intent::Reply {
                chat_id: 5,
                text: HELP_TEXT.into()
            }]
        );

        let decision = decide(&mut state, 5, "/log everything", &config, now);
        let Intent::Reply { text, .. } = &decision.intents[0] else {
            panic!("expected a reply");
        };
        assert!(text.contains("/log everything"));
    }

    #[test]
    fn log_commands_set_level() {
        let (mut state, config, now) = running();
        decide(&mut state, GAME, "/log important", &config, now);
        assert_eq!(state.log_level(), crate::state::LogLevel::ImportantOnly);
        decide(&mut state, GAME, "/Log All", &config, now);
        assert_eq!(state.log_level(), crate::state::LogLevel::All);
    }

    #[test]
    fn commands_do_not_touch_play_state() {
        let (mut state, config, now) = running();
        state.set_play_state(PlayState::InBattle);
        decide(&mut state, GAME, "/status", &config, now);
        assert_eq!(state.play_state(), PlayState::InBattle);
    }

    #[test]
    fn energy_shortage_waits_with_default_minutes() {
        let (mut state, config, now) = running();
        state.set_play_state(PlayState::Exploring);
        let decision = decide(
            &mut state,
            GAME,
            "❌ У вас 0/10 очків енергії",
            &config,
            now,
        );

        assert_eq!(state.play_state(), PlayState::WaitingEnergy);
        assert_eq!(state.energy(), Meter::new(0, 10));
        assert_eq!(state.seconds_until_energy(now), Some(300));
        assert_eq!(
            kinds(&decision),
            vec![
                ReportKind::StateChanged {
                    from: PlayState::Exploring,
                    to: PlayState::WaitingEnergy
                },
                ReportKind::NoEnergy { minutes: 5 }
            ]
        );
        assert!(decision.intents.contains(&Intent::StartCooldown { minutes: 5 }));
        assert!(decision.reports().all(|report| !report.is_important()));
    }

    #[test]
    fn cooldown_minutes_come_from_the_message() {
        let (mut state, config, now) = running();
        let decision = decide(
            &mut state,
            GAME,
            "❌ У вас 0/10 очків енергії. Енергія відновиться через 7 хв.",
            &config,
            now,
        );
        assert!(decision.intents.contains(&Intent::StartCooldown { minutes: 7 }));
        assert_eq!(state.seconds_until_energy(now), Some(420));
    }

    #[test]
    fn enemy_starts_battle() {
        let (mut state, config, now) = running();
        state.set_play_state(PlayState::Exploring);
        let decision = decide(&mut state, GAME, "🐺 З'явився Wolf!", &config, now);
        assert_eq!(state.play_state(), PlayState::InBattle);
        assert_eq!(
            kinds(&decision),
            vec![
                ReportKind::StateChanged {
                    from: PlayState::Exploring,
                    to: PlayState::InBattle
                },
                ReportKind::BattleStarted {
                    enemy: "Wolf".into()
                }
            ]
        );
        assert!(!explores(&decision));
    }

    #[test]
    fn already_in_battle_enters_battle() {
        let (mut state, config, now) = running();
        let decision = decide(&mut state, GAME, "❌ Ви в бою!", &config, now);
        assert_eq!(state.play_state(), PlayState::InBattle);
        assert_eq!(decision.rule, Some("already_in_battle"));
    }

    #[test]
    fn battle_round_is_silent() {
        let (mut state, config, now) = running();
        state.set_play_state(PlayState::InBattle);
        let decision = decide(
            &mut state,
            GAME,
            "--- Раунд 3 ---\n👤 Ви (250/300)",
            &config,
            now,
        );
        assert!(decision.intents.is_empty());
        assert_eq!(state.play_state(), PlayState::InBattle);
        assert_eq!(state.health(), Meter::new(250, 300));
    }

    #[test]
    fn victory_credits_rewards_and_explores() {
        let (mut state, config, now) = running();
        state.set_play_state(PlayState::InBattle);
        let gold = state.gold();
        let decision = decide(
            &mut state,
            GAME,
            "🏆 Перемога!\nВи отримали:\n💰 8 золота\n⭐ 15 досвіду",
            &config,
            now,
        );

        assert_eq!(state.play_state(), PlayState::Exploring);
        assert_eq!(state.gold(), gold + 8);
        let won = decision
            .reports()
            .find(|report| matches!(report.kind, ReportKind::BattleWon { .. }))
            .expect("victory report");
        assert_eq!(won.kind, ReportKind::BattleWon { gold: 8, exp: 15 });
        assert!(won.is_important());
        assert!(decision.intents.contains(&Intent::SendExplore {
            delay: Duration::from_secs(1)
        }));
    }

    #[test]
    fn victory_with_low_health_does_not_explore() {
        let (mut state, config, now) = running();
        state.set_play_state(PlayState::InBattle);
        let decision = decide(
            &mut state,
            GAME,
            "🏆 Перемога!\n👤 Ви (100/300)\nВи отримали:\n💰 3 золота",
            &config,
            now,
        );
        assert_eq!(state.play_state(), PlayState::Exploring);
        assert!(!explores(&decision));
    }

    #[test]
    fn defeat_waits_for_health() {
        let (mut state, config, now) = running();
        state.set_play_state(PlayState::InBattle);
        let decision = decide(&mut state, GAME, "💀 Ви зазнали поразки!", &config, now);
        assert_eq!(state.play_state(), PlayState::WaitingHealth);
        assert!(decision.reports().any(|report| {
            report.kind == ReportKind::BattleLost && report.is_important()
        }));
    }

    #[test]
    fn fled_enemy_ends_battle() {
        let (mut state, config, now) = running();
        state.set_play_state(PlayState::InBattle);
        let decision = decide(&mut state, GAME, "🐺 Wolf занудьгував і втік.", &config, now);
        assert_eq!(state.play_state(), PlayState::Exploring);
        assert!(kinds(&decision).contains(&ReportKind::BattleEnded));
        assert!(explores(&decision));
    }

    #[test]
    fn exploration_event_reports_and_explores() {
        let (mut state, config, now) = running();
        let decision = decide(
            &mut state,
            GAME,
            "🕯️ Ви натрапили на старий вівтар",
            &config,
            now,
        );
        assert_eq!(
            kinds(&decision),
            vec![ReportKind::FoundEvent {
                kind: ExplorationKind::Altar
            }]
        );
        assert!(explores(&decision));
        assert_eq!(decision.rule, Some("exploration"));
    }

    #[test]
    fn greetings() {
        let (mut state, config, now) = running();
        let decision = decide(&mut state, GAME, "👋 Ви привітали Олену!", &config, now);
        assert_eq!(
            kinds(&decision),
            vec![ReportKind::Greeted {
                player: "Олену".into()
            }]
        );

        let decision = decide(&mut state, GAME, "👋 Петро привітав вас!", &config, now);
        assert!(decision.intents.is_empty());
        assert_eq!(decision.rule, Some("greeting"));
    }

    #[test]
    fn not_in_battle_is_a_no_op() {
        let (mut state, config, now) = running();
        let decision = decide(&mut state, GAME, "❌ Ви не в бою", &config, now);
        assert!(decision.intents.is_empty());
        assert_eq!(decision.rule, Some("not_in_battle"));
    }

    #[test]
    fn health_too_low_waits() {
        let (mut state, config, now) = running();
        decide(&mut state, GAME, "У вас замало здоров'я", &config, now);
        assert_eq!(state.play_state(), PlayState::WaitingHealth);
    }

    #[test]
    fn items_are_important_and_fall_through() {
        let (mut state, config, now) = running();
        let decision = decide(&mut state, GAME, "🎁 Ви знайшли Зілля Енергії!", &config, now);
        let reports: Vec<_> = decision.reports().collect();
        assert_eq!(
            reports[0].kind,
            ReportKind::ItemFound {
                description: "Зілля Енергії".into()
            }
        );
        assert!(reports[0].is_important());
        assert_eq!(decision.rule, Some("default"));
        assert!(explores(&decision));
    }

    #[test]
    fn default_explores_when_possible() {
        let (mut state, config, now) = running();
        let decision = decide(&mut state, GAME, "Гарний день для пригод", &config, now);
        assert_eq!(state.play_state(), PlayState::Exploring);
        assert_eq!(
            kinds(&decision),
            vec![
                ReportKind::StateChanged {
                    from: PlayState::Idle,
                    to: PlayState::Exploring
                },
                ReportKind::Explored
            ]
        );
        assert!(explores(&decision));
    }

    #[test]
    fn default_ignores_error_and_divider_text() {
        let (mut state, config, now) = running();
        let decision = decide(&mut state, GAME, "❌ Щось пішло не так", &config, now);
        assert!(decision.intents.is_empty());
        let decision = decide(&mut state, GAME, "-----", &config, now);
        assert!(decision.intents.is_empty());
    }

    #[test]
    fn default_never_leaves_battle() {
        let (mut state, config, now) = running();
        state.set_play_state(PlayState::InBattle);
        let decision = decide(&mut state, GAME, "Вовк гарчить", &config, now);
        assert!(decision.intents.is_empty());
        assert_eq!(state.play_state(), PlayState::InBattle);
    }

    #[test]
    fn default_keeps_pending_cooldown() {
        let (mut state, config, now) = running();
        decide(&mut state, GAME, "❌ У вас 0/10 очків енергії", &config, now);
        let decision = decide(&mut state, GAME, "Тихо навколо", &config, now);
        assert!(decision.intents.is_empty());
        assert_eq!(state.play_state(), PlayState::WaitingEnergy);
    }

    #[test]
    fn energy_potion_restores_and_reports() {
        let (mut state, config, now) = running();
        decide(&mut state, GAME, "❌ У вас 0/10 очків енергії", &config, now);
        let decision = decide(
            &mut state,
            GAME,
            "⚡ Ви випили зілля енергії. Відновлено 5 енергії",
            &config,
            now,
        );
        assert!(kinds(&decision).contains(&ReportKind::EnergyRestored));
        assert_eq!(state.seconds_until_energy(now), None);
        assert_eq!(state.play_state(), PlayState::Exploring);
        assert!(explores(&decision));
    }

    #[test]
    fn level_up_is_important() {
        let (mut state, config, now) = running();
        let decision = decide(
            &mut state,
            GAME,
            "🎉 Рівень підвищено! 8 → 9\n❤️ Здоров'я: +10",
            &config,
            now,
        );
        assert_eq!(state.level(), 9);
        assert_eq!(state.health(), Meter::new(310, 310));
        assert!(decision.reports().any(|report| {
            report.kind == ReportKind::LevelUp { from: 8, to: 9 } && report.is_important()
        }));
    }

    #[test]
    fn scenario_status_after_shortage() {
        let (mut state, config, now) = running();
        let decision = decide(&mut state, GAME, "❌ У вас 0/10 очків енергії", &config, now);
        assert!(kinds(&decision).contains(&ReportKind::NoEnergy { minutes: 5 }));

        let decision = decide(&mut state, GAME, "/status", &config, now);
        assert_eq!(state.play_state(), PlayState::WaitingEnergy);
        let Intent::Reply { text, .. } = &decision.intents[0] else {
            panic!("expected a status reply");
        };
        assert!(text.contains("0/10"));
    }

    #[test]
    fn scenario_battle_cycle() {
        let (mut state, config, now) = running();
        state.set_play_state(PlayState::Exploring);
        let gold = state.gold();
        let experience = state.experience().current;

        decide(&mut state, GAME, "З'явився Wolf!", &config, now);
        assert_eq!(state.play_state(), PlayState::InBattle);

        let decision = decide_facts(
            &mut state,
            GAME,
            "",
            vec![
                Fact::BattleVictory,
                Fact::BattleRewards { gold: 8, exp: 15 },
            ],
            &config,
            now,
        );
        assert_eq!(state.play_state(), PlayState::Exploring);
        assert_eq!(state.gold(), gold + 8);
        assert_eq!(state.experience().current, experience + 15);
        assert!(decision.reports().any(|report| {
            matches!(report.kind, ReportKind::BattleWon { gold: 8, exp: 15 }) && report.is_important()
        }));
    }

    #[test]
    fn scenario_low_health() {
        let (mut state, config, now) = running();
        decide(&mut state, GAME, "❤️ Здоров'я: 85/100", &config, now);
        // The health line itself hits the default rule.
        assert_eq!(state.play_state(), PlayState::WaitingHealth);

        state.set_play_state(PlayState::Idle);
        let decision = decide(&mut state, GAME, "Навколо тихо", &config, now);
        assert_eq!(state.play_state(), PlayState::WaitingHealth);
        assert_eq!(
            kinds(&decision),
            vec![
                ReportKind::StateChanged {
                    from: PlayState::Idle,
                    to: PlayState::WaitingHealth
                },
                ReportKind::LowHealth
            ]
        );
    }

    #[test]
    fn between_gate_and_threshold_stays_put() {
        let (mut state, config, now) = running();
        decide(&mut state, GAME, "❤️ Здоров'я: 92/100", &config, now);
        // 92% is below the explore gate and above the low-health threshold.
        assert_eq!(state.play_state(), PlayState::Idle);
    }

    #[test]
    fn guild_chatter_never_explores() {
        let (mut state, config, now) = running();
        let decision = decide_from(
            &mut state,
            Origin::Guild,
            -200,
            "Хто йде в рейд сьогодні?",
            &config,
            now,
        );
        assert_eq!(decision.rule, Some("default"));
        assert!(decision.intents.is_empty());
        assert_eq!(state.play_state(), PlayState::Idle);
    }

    #[test]
    fn guild_messages_still_update_vitals_and_report() {
        let (mut state, config, now) = running();
        let decision = decide_from(
            &mut state,
            Origin::Guild,
            -200,
            "❤️ Здоров'я: 150/300\n🎁 Ви знайшли Камінь!",
            &config,
            now,
        );
        assert_eq!(state.health(), Meter::new(150, 300));
        assert_eq!(
            kinds(&decision),
            vec![ReportKind::ItemFound {
                description: "Камінь".into()
            }]
        );
        // No low-health parking from guild text either.
        assert_eq!(state.play_state(), PlayState::Idle);
    }

    #[test]
    fn owner_commands_are_handled() {
        let (mut state, config, now) = running();
        let decision = decide_from(&mut state, Origin::Owner, 42, "/stop", &config, now);
        assert_eq!(decision.rule, Some("commands"));
        assert!(!state.is_running());
    }
}
