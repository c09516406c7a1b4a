//! Pattern extraction from raw game messages.
//!
//! [`extract`] runs a fixed, ordered table of [`Matcher`]s over the message
//! text. Each matcher is independent and may push zero or more facts, so one
//! message can yield several facts (e.g. a battle summary carries a health
//! snapshot, rewards and found items). Extraction is total: unmatched text
//! yields no facts and malformed numbers read as `0`.

mod items;
mod patterns;

use patterns::*;

use crate::facts::{CharacterSheet, Fact};
use crate::state::Meter;

/// A named extraction step.
#[derive(Clone, Copy)]
pub struct Matcher {
    pub name: &'static str,
    pub extract: fn(&str, &mut Vec<Fact>),
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher").field("name", &self.name).finish()
    }
}

/// Extraction table, in the order facts are emitted.
pub const MATCHERS: &[Matcher] = &[
    Matcher { name: "character_info", extract: character_info },
    Matcher { name: "health_fully_restored", extract: health_fully_restored },
    Matcher { name: "health_snapshot", extract: health_snapshot },
    Matcher { name: "health_damage", extract: health_damage },
    Matcher { name: "health_potion", extract: health_potion },
    Matcher { name: "health_gain", extract: health_gain },
    Matcher { name: "health_too_low", extract: health_too_low },
    Matcher { name: "energy_shortage", extract: energy_shortage },
    Matcher { name: "energy_potion", extract: energy_potion },
    Matcher { name: "energy_gain", extract: energy_gain },
    Matcher { name: "energy_cooldown", extract: energy_cooldown },
    Matcher { name: "level_up", extract: level_up },
    Matcher { name: "max_health_increase", extract: max_health_increase },
    Matcher { name: "battle_rewards", extract: battle_rewards },
    Matcher { name: "enemy_appeared", extract: enemy_appeared },
    Matcher { name: "battle_markers", extract: battle_markers },
    Matcher { name: "exploration_event", extract: exploration_event },
    Matcher { name: "greetings", extract: greetings },
    Matcher { name: "items", extract: items::extract_items },
];

/// Extracts every fact present in `text`.
///
/// Text starting with `/` is a control command and yields exactly one
/// [`Fact::CommandReceived`].
pub fn extract(text: &str) -> Vec<Fact> {
    if let Some(command) = command(text) {
        return vec![command];
    }

    let mut facts = Vec::new();
    for matcher in MATCHERS {
        let before = facts.len();
        (matcher.extract)(text, &mut facts);
        if facts.len() > before {
            tracing::trace!(
                target: "game_core::extract",
                matcher = matcher.name,
                produced = facts.len() - before,
                "matcher produced facts"
            );
        }
    }
    facts
}

fn command(text: &str) -> Option<Fact> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    // Only the first separator is consumed; inner spacing stays significant.
    let (verb, args) = match trimmed.find(char::is_whitespace) {
        Some(at) => {
            let separator = trimmed[at..].chars().next().map_or(1, char::len_utf8);
            (&trimmed[..at], &trimmed[at + separator..])
        }
        None => (trimmed, ""),
    };
    Some(Fact::CommandReceived {
        verb: verb.to_owned(),
        args: args.to_owned(),
    })
}

fn character_info(text: &str, facts: &mut Vec<Fact>) {
    let mut sheet = CharacterSheet::default();

    if let Some(caps) = RE_SHEET_HEADER.captures(text) {
        let raw = caps.get(1).map_or("", |m| m.as_str());
        let name = RE_NAME_TAG.replace_all(raw, "");
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        if !name.is_empty() {
            sheet.name = Some(name);
        }
        sheet.level = Some(number(&caps, 2));
    }
    sheet.health = fraction(&RE_SHEET_HEALTH, text).map(|(cur, max)| Meter::new(cur, max));
    sheet.energy = fraction(&RE_SHEET_ENERGY, text).map(|(cur, max)| Meter::new(cur, max));
    sheet.gold = single(&RE_SHEET_GOLD, text);
    sheet.experience =
        fraction(&RE_SHEET_EXPERIENCE, text).map(|(cur, max)| Meter::new(cur, max));

    if !sheet.is_empty() {
        facts.push(Fact::CharacterInfo(sheet));
    }
}

fn health_fully_restored(text: &str, facts: &mut Vec<Fact>) {
    if text.contains(HEALTH_RESTORED)
        && let Some((_, max)) = fraction(&RE_PAREN_FRACTION, text)
    {
        facts.push(Fact::HealthFullyRestored { max });
    }
}

fn health_snapshot(text: &str, facts: &mut Vec<Fact>) {
    if let Some((current, max)) = fraction(&RE_BATTLE_HEALTH, text) {
        facts.push(Fact::HealthSnapshot { current, max });
    }
}

fn health_damage(text: &str, facts: &mut Vec<Fact>) {
    if let Some(amount) = single(&RE_HEALTH_DAMAGE, text) {
        facts.push(Fact::HealthDamage { amount });
    }
}

fn health_potion(text: &str, facts: &mut Vec<Fact>) {
    if text.contains(HEALTH_POTION)
        && let Some(restored) = single(&RE_HEALTH_POTION, text)
    {
        facts.push(Fact::HealthPotionUsed {
            restored,
            is_large: text.contains(LARGE_HEALTH_POTION),
        });
    }
}

fn health_gain(text: &str, facts: &mut Vec<Fact>) {
    if let Some(amount) = single(&RE_HEALTH_GAIN, text) {
        facts.push(Fact::HealthGainEvent { amount });
    }
}

fn health_too_low(text: &str, facts: &mut Vec<Fact>) {
    if text.contains(HEALTH_TOO_LOW) {
        facts.push(Fact::HealthTooLow);
    }
}

fn energy_shortage(text: &str, facts: &mut Vec<Fact>) {
    if let Some((current, max)) = fraction(&RE_ENERGY_SHORTAGE, text) {
        facts.push(Fact::EnergyShortage { current, max });
    }
}

fn energy_potion(text: &str, facts: &mut Vec<Fact>) {
    if text.contains(ENERGY_POTION)
        && let Some(restored) = single(&RE_ENERGY_POTION, text)
    {
        facts.push(Fact::EnergyPotionUsed { restored });
    }
}

fn energy_gain(text: &str, facts: &mut Vec<Fact>) {
    if let Some(amount) = single(&RE_ENERGY_GAIN, text) {
        facts.push(Fact::EnergyGainEvent { amount });
    }
}

fn energy_cooldown(text: &str, facts: &mut Vec<Fact>) {
    // The sheet shows a regen timer whenever energy is below max; it only
    // means a cooldown once energy is empty.
    let sheet_empty = fraction(&RE_SHEET_ENERGY, text).is_none_or(|(current, _)| current == 0);
    let minutes = single(&RE_COOLDOWN, text)
        .or_else(|| sheet_empty.then(|| single(&RE_COOLDOWN_SHEET, text)).flatten());
    if let Some(minutes) = minutes {
        facts.push(Fact::EnergyCooldown { minutes });
    }
}

fn level_up(text: &str, facts: &mut Vec<Fact>) {
    if text.contains(LEVEL_UP)
        && let Some((from, to)) = fraction(&RE_LEVEL_ARROW, text)
    {
        facts.push(Fact::LevelUp { from, to });
    }
}

fn max_health_increase(text: &str, facts: &mut Vec<Fact>) {
    if let Some(amount) = single(&RE_MAX_HEALTH, text) {
        facts.push(Fact::MaxHealthIncrease { amount });
    }
}

fn battle_rewards(text: &str, facts: &mut Vec<Fact>) {
    let gold = single(&RE_REWARD_GOLD, text);
    let exp = single(&RE_REWARD_EXPERIENCE, text);
    if gold.is_some() || exp.is_some() {
        facts.push(Fact::BattleRewards {
            gold: gold.unwrap_or(0),
            exp: exp.unwrap_or(0),
        });
    }
}

fn enemy_appeared(text: &str, facts: &mut Vec<Fact>) {
    if !text.contains(ENEMY_APPEARED) {
        return;
    }
    let name = RE_ENEMY
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unknown".to_owned());
    facts.push(Fact::EnemyAppeared { name });
}

fn battle_markers(text: &str, facts: &mut Vec<Fact>) {
    if text.contains(BATTLE_ROUND) {
        facts.push(Fact::BattleRoundMarker);
    }
    if text.contains(REWARDS_HEADER) && text.contains(REWARDS_GOLD_WORD) {
        facts.push(Fact::BattleVictory);
    }
    if text.contains(BATTLE_DEFEAT) {
        facts.push(Fact::BattleDefeat);
    }
    if text.contains(ENEMY_FLED) {
        facts.push(Fact::EnemyFled);
    }
    if text.contains(ESCAPED) {
        facts.push(Fact::EscapedBattle);
    }
    if text.contains(ALREADY_IN_BATTLE) {
        facts.push(Fact::AlreadyInBattle);
    }
    if text.contains(NOT_IN_BATTLE) {
        facts.push(Fact::NotInBattle);
    }
}

fn exploration_event(text: &str, facts: &mut Vec<Fact>) {
    let kind = EXPLORATION_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|marker| text.contains(marker)))
        .map(|(kind, _)| *kind);
    if let Some(kind) = kind {
        facts.push(Fact::ExplorationEvent { kind });
    }
}

fn greetings(text: &str, facts: &mut Vec<Fact>) {
    if text.contains(GREETING_SENT) {
        let player = RE_GREETING_SENT
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_owned())
            .filter(|player| !player.is_empty())
            .unwrap_or_else(|| "someone".to_owned());
        facts.push(Fact::GreetingSent { player });
    } else if text.contains(GREETING_WAVE) && text.contains(GREETING_VERB) {
        facts.push(Fact::GreetingReceived);
    }
}
