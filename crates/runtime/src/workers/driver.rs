//! Game loop driver.
//!
//! A long-lived task that keeps the bot moving when no game message arrives
//! to trigger the policy: it kicks off a session with a status check, sleeps
//! through energy cooldowns, and after a quiet period either nudges
//! exploration or, when it cannot explore, re-reads the character sheet.
//! Every wait is interrupted by a bot start/stop, a freshly armed cooldown,
//! or shutdown, and the driver re-reads the store after each one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tracing::{debug, info, warn};

use game_core::{BotState, Intent, PlayState, Report, ReportKind, Transition};

use crate::api::{DriverView, Result, StoreHandle};
use crate::config::RuntimeConfig;
use crate::dispatch::ActionDispatcher;

pub struct GameLoopDriver {
    store: StoreHandle,
    dispatcher: ActionDispatcher,
    bot_state_rx: watch::Receiver<BotState>,
    cooldown_wake: Arc<Notify>,
    shutdown_rx: watch::Receiver<bool>,
    stopped_poll: Duration,
    idle_poll: Duration,
    cooldown_cap: Duration,
    stall_timeout: Duration,
}

impl GameLoopDriver {
    pub fn new(
        store: StoreHandle,
        dispatcher: ActionDispatcher,
        cooldown_wake: Arc<Notify>,
        shutdown_rx: watch::Receiver<bool>,
        config: &RuntimeConfig,
    ) -> Self {
        Self {
            bot_state_rx: store.watch_bot_state(),
            store,
            dispatcher,
            cooldown_wake,
            shutdown_rx,
            stopped_poll: config.stopped_poll,
            idle_poll: config.idle_poll,
            cooldown_cap: config.cooldown_cap,
            stall_timeout: config.stall_timeout,
        }
    }

    /// Main driver loop.
    pub async fn run(mut self) {
        loop {
            let wait = match self.tick().await {
                Ok(wait) => wait,
                Err(err) => {
                    warn!(target: "runtime::driver", error = %err, "store unavailable, driver exiting");
                    break;
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                changed = self.bot_state_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let bot_state = *self.bot_state_rx.borrow();
                    debug!(target: "runtime::driver", %bot_state, "woken by bot state change");
                }
                _ = self.cooldown_wake.notified() => {
                    debug!(target: "runtime::driver", "woken by cooldown");
                }
                _ = self.shutdown_rx.changed() => break,
            }
        }
        debug!(target: "runtime::driver", "driver stopped");
    }

    /// One pass over the current state; returns how long to wait next.
    async fn tick(&self) -> Result<Duration> {
        let view = self.store.driver_view().await?;
        if !view.is_running() {
            return Ok(self.stopped_poll);
        }

        if let Some(seconds) = view.seconds_until_energy {
            let wait = Duration::from_secs(seconds).min(self.cooldown_cap);
            debug!(target: "runtime::driver", seconds, wait_secs = wait.as_secs(), "waiting out energy cooldown");
            return Ok(wait);
        }

        let mut intents = Vec::new();

        if view.energy_wait_elapsed && self.store.expire_energy_wait().await? {
            info!(target: "runtime::driver", "energy cooldown elapsed");
            intents.push(Intent::Report(Report::normal(ReportKind::EnergyRestored)));
            intents.push(self.status_check());
        } else {
            self.plan(&view, &mut intents).await?;
        }

        if !intents.is_empty() {
            self.store.record_activity().await?;
            let context = self.store.report_context().await?;
            self.dispatcher.dispatch(intents, &context).await;
        }
        Ok(self.idle_poll)
    }

    async fn plan(&self, view: &DriverView, intents: &mut Vec<Intent>) -> Result<()> {
        match view.play_state {
            PlayState::Idle => {
                // Fresh session: read the character sheet, then explore.
                intents.push(self.status_check());
                if let Some(transition) = self
                    .store
                    .transition_from(PlayState::Idle, PlayState::Exploring)
                    .await?
                {
                    push_transition(intents, transition);
                }
            }
            PlayState::WaitingHealth if view.can_explore => {
                if let Some(transition) = self
                    .store
                    .transition_from(PlayState::WaitingHealth, PlayState::Exploring)
                    .await?
                {
                    push_transition(intents, transition);
                    intents.push(Intent::Report(Report::normal(ReportKind::HealthRecovered)));
                    intents.push(self.explore());
                }
            }
            PlayState::InBattle => {}
            _ if !view.stalled(self.stall_timeout) => {}
            _ if view.can_explore => {
                info!(target: "runtime::driver", "no game activity, nudging exploration");
                intents.push(self.explore());
            }
            _ => {
                // Below the explore gate; the sheet reply re-runs the policy.
                info!(target: "runtime::driver", play_state = %view.play_state, "cannot explore, re-checking status");
                intents.push(self.status_check());
            }
        }
        Ok(())
    }

    fn explore(&self) -> Intent {
        Intent::SendExplore {
            delay: Duration::ZERO,
        }
    }

    fn status_check(&self) -> Intent {
        Intent::SendStatusCheck {
            delay: Duration::ZERO,
        }
    }
}

fn push_transition(intents: &mut Vec<Intent>, transition: Transition) {
    if transition.changed {
        intents.push(Intent::Report(Report::normal(ReportKind::StateChanged {
            from: transition.from,
            to: transition.to,
        })));
    }
}
