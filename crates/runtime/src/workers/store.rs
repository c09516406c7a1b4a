//! Store worker that owns the authoritative [`game_core::GameState`].
//!
//! Every read and mutation arrives as a [`Command`] on one channel and runs to
//! completion before the next is taken, so the message router and the game
//! loop driver never observe a partially applied update.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use game_core::{BotState, GameConfig, GameState, Origin, PlayState, Transition, policy};

use crate::api::{DriverView, Handled, ReportContext};
use crate::clock::Clock;

/// Commands accepted by the store worker.
pub enum Command {
    /// Extract, apply and decide one inbound message.
    HandleMessage {
        origin: Origin,
        chat_id: i64,
        text: String,
        reply: oneshot::Sender<Handled>,
    },
    SetPlayState {
        to: PlayState,
        reply: oneshot::Sender<Transition>,
    },
    /// Moves to `to` only when the current play state is `from`.
    TransitionFrom {
        from: PlayState,
        to: PlayState,
        reply: oneshot::Sender<Option<Transition>>,
    },
    StartBot {
        reply: oneshot::Sender<Transition>,
    },
    StopBot {
        reply: oneshot::Sender<Transition>,
    },
    SetEnergyWait {
        minutes: u32,
        reply: oneshot::Sender<Transition>,
    },
    ExpireEnergyWait {
        reply: oneshot::Sender<bool>,
    },
    SetReportingChat {
        chat_id: i64,
        reply: oneshot::Sender<()>,
    },
    RecordActivity {
        reply: oneshot::Sender<()>,
    },
    CanExplore {
        reply: oneshot::Sender<bool>,
    },
    SecondsUntilEnergy {
        reply: oneshot::Sender<Option<u64>>,
    },
    StatusString {
        reply: oneshot::Sender<String>,
    },
    ReportContext {
        reply: oneshot::Sender<ReportContext>,
    },
    DriverView {
        reply: oneshot::Sender<DriverView>,
    },
    QueryState {
        reply: oneshot::Sender<GameState>,
    },
}

pub struct StoreWorker {
    state: GameState,
    config: GameConfig,
    clock: Arc<dyn Clock>,
    command_rx: mpsc::Receiver<Command>,
    bot_state_tx: watch::Sender<BotState>,
    shutdown_rx: watch::Receiver<bool>,
}

impl StoreWorker {
    pub fn new(
        state: GameState,
        config: GameConfig,
        clock: Arc<dyn Clock>,
        command_rx: mpsc::Receiver<Command>,
        bot_state_tx: watch::Sender<BotState>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        tracing::info!(
            target: "runtime::store",
            bot_state = %state.bot_state(),
            play_state = %state.play_state(),
            "store worker initialized"
        );

        Self {
            state,
            config,
            clock,
            command_rx,
            bot_state_tx,
            shutdown_rx,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                    self.publish_bot_state();
                }
                _ = self.shutdown_rx.changed() => break,
                else => break,
            }
        }
        debug!(target: "runtime::store", "store worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        let now = self.clock.now();
        match cmd {
            Command::HandleMessage {
                origin,
                chat_id,
                text,
                reply,
            } => {
                let decision =
                    policy::decide_from(&mut self.state, origin, chat_id, &text, &self.config, now);
                let handled = Handled {
                    decision,
                    context: self.report_context(),
                };
                if reply.send(handled).is_err() {
                    debug!(target: "runtime::store", "HandleMessage reply channel closed (caller dropped)");
                }
            }
            Command::SetPlayState { to, reply } => {
                let _ = reply.send(self.state.set_play_state(to));
            }
            Command::TransitionFrom { from, to, reply } => {
                let transition =
                    (self.state.play_state() == from).then(|| self.state.set_play_state(to));
                let _ = reply.send(transition);
            }
            Command::StartBot { reply } => {
                let _ = reply.send(self.state.start_bot());
            }
            Command::StopBot { reply } => {
                let _ = reply.send(self.state.stop_bot());
            }
            Command::SetEnergyWait { minutes, reply } => {
                let _ = reply.send(self.state.set_energy_wait(minutes, now));
            }
            Command::ExpireEnergyWait { reply } => {
                let expired = self.state.expire_energy_wait(now);
                if expired {
                    debug!(target: "runtime::store", energy = %self.state.energy(), "energy cooldown elapsed");
                }
                let _ = reply.send(expired);
            }
            Command::SetReportingChat { chat_id, reply } => {
                self.state.set_reporting_chat(chat_id);
                let _ = reply.send(());
            }
            Command::RecordActivity { reply } => {
                self.state.record_activity(now);
                let _ = reply.send(());
            }
            Command::CanExplore { reply } => {
                let _ = reply.send(self.state.can_explore());
            }
            Command::SecondsUntilEnergy { reply } => {
                let _ = reply.send(self.state.seconds_until_energy(now));
            }
            Command::StatusString { reply } => {
                let _ = reply.send(self.state.status_string(now));
            }
            Command::ReportContext { reply } => {
                let _ = reply.send(self.report_context());
            }
            Command::DriverView { reply } => {
                let view = DriverView {
                    bot_state: self.state.bot_state(),
                    play_state: self.state.play_state(),
                    can_explore: self.state.can_explore(),
                    seconds_until_energy: self.state.seconds_until_energy(now),
                    energy_wait_elapsed: self
                        .state
                        .energy_wait_until()
                        .is_some_and(|until| now >= until),
                    idle_for: self.state.idle_for(now),
                };
                let _ = reply.send(view);
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!(target: "runtime::store", "QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn report_context(&self) -> ReportContext {
        ReportContext {
            log_level: self.state.log_level(),
            reporting_chat_id: self.state.reporting_chat_id(),
            status: self.state.status_string(self.clock.now()),
        }
    }

    fn publish_bot_state(&self) {
        let bot_state = self.state.bot_state();
        self.bot_state_tx.send_if_modified(|current| {
            if *current == bot_state {
                return false;
            }
            tracing::info!(target: "runtime::store", from = %current, to = %bot_state, "bot state changed");
            *current = bot_state;
            true
        });
    }
}
