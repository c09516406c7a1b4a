//! Fixed-layout status snapshot appended to every report.

use std::fmt::Write;
use std::time::Instant;

use super::{BotState, GameState, PlayState};

impl GameState {
    /// Renders the status block:
    ///
    /// ```text
    /// 🔹 <name> (Lvl <level>)
    /// ❤️ <hp>/<max> (<pct>%) | ⚡ <energy>/<max>
    /// ✨ <exp>/<max> (<pct>%)
    /// <state line>
    /// ```
    pub fn status_string(&self, now: Instant) -> String {
        let mut status = String::with_capacity(128);

        // Writing into a String cannot fail.
        let _ = writeln!(status, "🔹 {} (Lvl {})", self.name, self.level);
        let _ = writeln!(
            status,
            "❤️ {} ({}%) | ⚡ {}",
            self.health,
            self.health.percent(),
            self.energy
        );
        let _ = writeln!(
            status,
            "✨ {} ({}%)",
            self.experience,
            self.experience.percent()
        );

        if self.bot_state == BotState::Stopped {
            status.push_str("🛑 Bot stopped");
            return status;
        }

        match self.play_state {
            PlayState::Idle => status.push_str("💬 Waiting for command"),
            PlayState::Exploring => status.push_str("✅ Ready to explore"),
            PlayState::InBattle => status.push_str("⚔️ In battle"),
            PlayState::WaitingEnergy => match self.seconds_until_energy(now) {
                Some(seconds) => {
                    let _ = write!(status, "⏳ Energy in {}m {}s", seconds / 60, seconds % 60);
                }
                None => status.push_str("⏳ Waiting for energy"),
            },
            PlayState::WaitingHealth => status.push_str("💤 Waiting for health"),
        }

        status
    }
}
