//! Compiled game-text patterns and marker substrings.
//!
//! Patterns are matched verbatim against the game's Ukrainian text. Emoji
//! variation selectors (U+FE0F) are optional because the game is not
//! consistent about sending them.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::facts::ExplorationKind;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub(super) static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect(concat!("invalid ", stringify!($name), " regex")));
    };
}

// ----- character sheet -----
pattern!(RE_SHEET_HEADER, r"⚔️?\s*(.+?)\s*-\s*Рівень\s*(\d+)");
pattern!(RE_NAME_TAG, r"\{[^}]+\}");
pattern!(RE_SHEET_HEALTH, r"❤️?\s*Здоров'я:\s*(\d+)/(\d+)");
pattern!(RE_SHEET_ENERGY, r"⚡\s*Енергія:\s*(\d+)/(\d+)");
pattern!(RE_SHEET_GOLD, r"💰\s*Золото:\s*(\d+)");
pattern!(RE_SHEET_EXPERIENCE, r"✨\s*Досвід:\s*(\d+)/(\d+)");

// ----- health -----
pattern!(RE_PAREN_FRACTION, r"\((\d+)/(\d+)\)");
pattern!(RE_BATTLE_HEALTH, r"👤\s*Ви\s*\((\d+)/(\d+)\)");
pattern!(RE_HEALTH_DAMAGE, r"\(-(\d+)\s*❤️?\s*здоров'я\)");
pattern!(RE_HEALTH_POTION, r"Відновлено\s*(\d+)\s*здоров'я");
pattern!(RE_HEALTH_GAIN, r"\(\+(\d+)\s*❤️?\s*здоров'я\)");

// ----- energy -----
pattern!(RE_ENERGY_SHORTAGE, r"У\s*вас\s*(\d+)/(\d+)\s*очків\s*енергії");
pattern!(RE_ENERGY_POTION, r"Відновлено\s*(\d+)\s*енергії");
pattern!(RE_ENERGY_GAIN, r"\(?\+(\d+)\s*⚡\s*енергія\)?");
pattern!(RE_COOLDOWN, r"відновиться\s*через\s*(\d+)\s*хв");
pattern!(RE_COOLDOWN_SHEET, r"(\d+)\s*хв\s*до\s*відновлення\s*енергії");

// ----- progression -----
pattern!(RE_LEVEL_ARROW, r"(\d+)\s*→\s*(\d+)");
pattern!(RE_MAX_HEALTH, r"❤️?\s*Здоров'я:\s*\+(\d+)");

// ----- battle -----
pattern!(RE_REWARD_GOLD, r"💰\s*(\d+)\s*золота");
pattern!(RE_REWARD_EXPERIENCE, r"⭐\s*(\d+)\s*досвіду");
pattern!(RE_ENEMY, r"З'явився\s+([^!\n(]+)");

// ----- social -----
pattern!(RE_GREETING_SENT, r"Ви\s+привітали\s+([^!.\n]+)");

// ----- marker substrings -----
pub(super) const HEALTH_RESTORED: &str = "здоров'я повністю відновлено";
pub(super) const HEALTH_POTION: &str = "Зілля Здоров'я";
pub(super) const LARGE_HEALTH_POTION: &str = "Велике Зілля Здоров'я";
pub(super) const HEALTH_TOO_LOW: &str = "замало здоров'я";
pub(super) const ENERGY_POTION: &str = "зілля енергії";
pub(super) const LEVEL_UP: &str = "Рівень підвищено";
pub(super) const REWARDS_HEADER: &str = "Ви отримали:";
pub(super) const REWARDS_GOLD_WORD: &str = "золота";
pub(super) const ENEMY_APPEARED: &str = "З'явився";
pub(super) const BATTLE_ROUND: &str = "--- Раунд";
pub(super) const BATTLE_DEFEAT: &str = "Ви зазнали поразки!";
pub(super) const ENEMY_FLED: &str = "занудьгував і втік";
pub(super) const ESCAPED: &str = "Вам вдалося втекти!";
pub(super) const ALREADY_IN_BATTLE: &str = "Ви в бою!";
pub(super) const NOT_IN_BATTLE: &str = "Ви не в бою";
pub(super) const GREETING_WAVE: &str = "👋";
pub(super) const GREETING_VERB: &str = "привітав";
pub(super) const GREETING_SENT: &str = "Ви привітали";

/// Headers that open a multi-line "items found" block.
pub(super) const ITEM_BLOCK_HEADERS: &[&str] = &["Знайдені предмети:", "Ви знайшли:", "Знайдено:"];
/// Prefix of a single-line find.
pub(super) const ITEM_FOUND_PREFIX: &str = "Ви знайшли";

/// Exploration markers in priority order; the first kind with any marker
/// present wins.
pub(super) const EXPLORATION_MARKERS: &[(ExplorationKind, &[&str])] = &[
    (ExplorationKind::Garden, &["🐝", "🌸", "джміль"]),
    (ExplorationKind::Altar, &["🕯", "вівтар"]),
    (ExplorationKind::Monument, &["🗿", "пам'ятник"]),
    (ExplorationKind::Footprints, &["👣", "сліди"]),
    (ExplorationKind::Runes, &["📖", "руни", "рунами"]),
    (ExplorationKind::Echo, &["Ви чуєте", "відлуння"]),
    (ExplorationKind::LuckyCoin, &["🪙", "монетку"]),
    (ExplorationKind::MeditationSpot, &["🧘", "медитац"]),
    (
        ExplorationKind::Generic,
        &["Ви помітили", "Ви натрапили", "Ви відкрили", "Ви виявили", "🔍"],
    ),
];

/// Numeric capture `index`, or `0` when it is missing or does not fit.
pub(super) fn number(caps: &Captures<'_>, index: usize) -> u32 {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Captures a `(current, max)` pair from the first match of `re`.
pub(super) fn fraction(re: &Regex, text: &str) -> Option<(u32, u32)> {
    re.captures(text)
        .map(|caps| (number(&caps, 1), number(&caps, 2)))
}

/// Captures a single number from the first match of `re`.
pub(super) fn single(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text).map(|caps| number(&caps, 1))
}
