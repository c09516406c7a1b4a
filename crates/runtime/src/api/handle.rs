//! Cloneable façade over the store worker.
//!
//! [`StoreHandle`] hides channel plumbing and exposes each serialized store
//! operation as an async method. Clones share the same worker, so the router,
//! the driver and embedders all observe one consistent [`GameState`].
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use game_core::{BotState, GameState, Origin, PlayState, Transition};

use super::errors::{Result, RuntimeError};
use super::views::{DriverView, Handled, ReportContext};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to the game state store.
#[derive(Clone)]
pub struct StoreHandle {
    command_tx: mpsc::Sender<Command>,
    bot_state_rx: watch::Receiver<BotState>,
    event_bus: EventBus,
}

impl StoreHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        bot_state_rx: watch::Receiver<BotState>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            command_tx,
            bot_state_rx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Runs one inbound message through extraction and the policy.
    pub async fn handle_message(
        &self,
        origin: Origin,
        chat_id: i64,
        text: impl Into<String>,
    ) -> Result<Handled> {
        let text = text.into();
        self.request(|reply| Command::HandleMessage {
            origin,
            chat_id,
            text,
            reply,
        })
        .await
    }

    pub async fn set_play_state(&self, to: PlayState) -> Result<Transition> {
        self.request(|reply| Command::SetPlayState { to, reply }).await
    }

    /// Compare-and-set on the play state; `None` when it was not `from`.
    pub async fn transition_from(
        &self,
        from: PlayState,
        to: PlayState,
    ) -> Result<Option<Transition>> {
        self.request(|reply| Command::TransitionFrom { from, to, reply })
            .await
    }

    pub async fn start_bot(&self) -> Result<Transition> {
        self.request(|reply| Command::StartBot { reply }).await
    }

    pub async fn stop_bot(&self) -> Result<Transition> {
        self.request(|reply| Command::StopBot { reply }).await
    }

    pub async fn set_energy_wait(&self, minutes: u32) -> Result<Transition> {
        self.request(|reply| Command::SetEnergyWait { minutes, reply })
            .await
    }

    /// Clears an elapsed cooldown; `true` only on the call that observes it.
    pub async fn expire_energy_wait(&self) -> Result<bool> {
        self.request(|reply| Command::ExpireEnergyWait { reply }).await
    }

    pub async fn set_reporting_chat(&self, chat_id: i64) -> Result<()> {
        self.request(|reply| Command::SetReportingChat { chat_id, reply })
            .await
    }

    pub async fn record_activity(&self) -> Result<()> {
        self.request(|reply| Command::RecordActivity { reply }).await
    }

    pub async fn can_explore(&self) -> Result<bool> {
        self.request(|reply| Command::CanExplore { reply }).await
    }

    pub async fn seconds_until_energy(&self) -> Result<Option<u64>> {
        self.request(|reply| Command::SecondsUntilEnergy { reply })
            .await
    }

    pub async fn status_string(&self) -> Result<String> {
        self.request(|reply| Command::StatusString { reply }).await
    }

    pub async fn report_context(&self) -> Result<ReportContext> {
        self.request(|reply| Command::ReportContext { reply }).await
    }

    pub async fn driver_view(&self) -> Result<DriverView> {
        self.request(|reply| Command::DriverView { reply }).await
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Latest bot lifecycle state, without a store round trip.
    pub fn bot_state(&self) -> BotState {
        *self.bot_state_rx.borrow()
    }

    /// Receiver that changes whenever the bot starts or stops.
    pub fn watch_bot_state(&self) -> watch::Receiver<BotState> {
        self.bot_state_rx.clone()
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Report` - Every report decision, delivered or filtered
    /// - `Topic::Outbound` - Every command and reply sent to a chat
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
