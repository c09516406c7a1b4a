//! Runtime configuration shared across the orchestrator and workers.
use std::env;
use std::time::Duration;

use game_core::{GameConfig, LogLevel};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Chat where the game bot answers.
    pub game_chat_id: i64,
    /// Guild chat; its messages are processed like game messages.
    pub guild_chat_id: i64,
    /// Owner's private chat for reports; control commands are accepted here too.
    pub report_chat_id: i64,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Driver poll interval while the bot is stopped.
    pub stopped_poll: Duration,
    /// Driver poll interval while running with nothing to wait for.
    pub idle_poll: Duration,
    /// Longest single sleep while a cooldown is pending.
    pub cooldown_cap: Duration,
    /// Quiet period after which the driver sends a command on its own.
    pub stall_timeout: Duration,
    /// Start in `Running` instead of waiting for `/start`.
    pub autostart: bool,
    pub log_level: LogLevel,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            game_chat_id: 0,
            guild_chat_id: 0,
            report_chat_id: 0,
            command_buffer_size: 32,
            event_buffer_size: 100,
            stopped_poll: Duration::from_secs(60),
            idle_poll: Duration::from_secs(30),
            cooldown_cap: Duration::from_secs(60),
            stall_timeout: Duration::from_secs(90),
            autostart: false,
            log_level: LogLevel::All,
        }
    }
}

impl RuntimeConfig {
    /// Construct runtime configuration from environment variables.
    ///
    /// Environment variables:
    /// - `OSTROMAG_GAME_CHAT_ID` - Game bot chat id
    /// - `OSTROMAG_GUILD_CHAT_ID` - Guild chat id
    /// - `OSTROMAG_REPORT_CHAT_ID` - Owner chat for reports and commands
    /// - `OSTROMAG_AUTOSTART` - Start running immediately (default: false)
    /// - `OSTROMAG_IDLE_POLL_SECS` - Idle poll interval (default: 30)
    /// - `OSTROMAG_STOPPED_POLL_SECS` - Stopped poll interval (default: 60)
    /// - `OSTROMAG_COOLDOWN_CAP_SECS` - Longest cooldown sleep (default: 60)
    /// - `OSTROMAG_STALL_SECS` - Quiet period before a nudge (default: 90)
    /// - `OSTROMAG_LOG_LEVEL` - `all` or `important` (default: all)
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(id) = read_env::<i64>("OSTROMAG_GAME_CHAT_ID") {
            config.game_chat_id = id;
        }
        if let Some(id) = read_env::<i64>("OSTROMAG_GUILD_CHAT_ID") {
            config.guild_chat_id = id;
        }
        if let Some(id) = read_env::<i64>("OSTROMAG_REPORT_CHAT_ID") {
            config.report_chat_id = id;
        }
        if let Some(autostart) = read_env::<bool>("OSTROMAG_AUTOSTART") {
            config.autostart = autostart;
        }
        if let Some(secs) = read_env::<u64>("OSTROMAG_IDLE_POLL_SECS") {
            config.idle_poll = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("OSTROMAG_STOPPED_POLL_SECS") {
            config.stopped_poll = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("OSTROMAG_COOLDOWN_CAP_SECS") {
            config.cooldown_cap = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("OSTROMAG_STALL_SECS") {
            config.stall_timeout = Duration::from_secs(secs);
        }
        if let Some(level) = read_env::<LogLevel>("OSTROMAG_LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
