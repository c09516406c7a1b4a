//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for embedding the bot.

use std::sync::Arc;

use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use game_core::GameState;

use crate::api::{
    ChatClient, ChatMessage, ChatNotifier, Notifier, Result, RuntimeError, StoreHandle,
};
use crate::clock::{Clock, TokioClock};
use crate::config::RuntimeConfig;
use crate::dispatch::ActionDispatcher;
use crate::events::{Event, EventBus, Topic};
use crate::router::MessageRouter;
use crate::workers::{Command, GameLoopDriver, StoreWorker};

/// Main runtime that runs the bot
///
/// Design: Runtime owns workers and coordinates shutdown.
/// [`StoreHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: StoreHandle,
    router: MessageRouter,
    shutdown_tx: watch::Sender<bool>,

    // Background workers
    store_worker_handle: JoinHandle<()>,
    driver_handle: JoinHandle<()>,
    router_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to the game state store
    pub fn handle(&self) -> StoreHandle {
        self.handle.clone()
    }

    /// Router for feeding messages directly instead of through an inbound
    /// channel.
    pub fn router(&self) -> MessageRouter {
        self.router.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Scheduled game commands that have not fired yet are abandoned.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);

        if let Some(router_handle) = self.router_handle {
            router_handle.await.map_err(RuntimeError::WorkerJoin)?;
        }
        self.driver_handle.await.map_err(RuntimeError::WorkerJoin)?;
        self.store_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        tracing::info!(target: "runtime::driver", "runtime shut down");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    chat: Option<Arc<dyn ChatClient>>,
    notifier: Option<Arc<dyn Notifier>>,
    inbound: Option<mpsc::Receiver<ChatMessage>>,
    clock: Arc<dyn Clock>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            chat: None,
            notifier: None,
            inbound: None,
            clock: Arc::new(TokioClock),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial game state
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the chat transport (required)
    pub fn chat_client(mut self, chat: impl ChatClient + 'static) -> Self {
        self.chat = Some(Arc::new(chat));
        self
    }

    /// Set a shared chat transport (required unless [`Self::chat_client`] is used)
    pub fn shared_chat_client(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Set the report sink (optional; defaults to reporting through the chat client)
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Stream of inbound chat messages (optional; see [`Runtime::router`])
    pub fn inbound(mut self, inbound: mpsc::Receiver<ChatMessage>) -> Self {
        self.inbound = Some(inbound);
        self
    }

    /// Override the time source
    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Build the runtime and spawn its workers
    pub async fn build(self) -> Result<Runtime> {
        let chat = self.chat.ok_or(RuntimeError::MissingCollaborator {
            what: "chat client",
        })?;
        let notifier = self.notifier.unwrap_or_else(|| {
            Arc::new(ChatNotifier::new(Arc::clone(&chat))) as Arc<dyn Notifier>
        });
        let config = self.config;

        let mut state = self
            .state
            .unwrap_or_else(|| GameState::with_config(&config.game_config));
        state.set_reporting_chat(config.report_chat_id);
        state.set_log_level(config.log_level);
        if config.autostart {
            state.start_bot();
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size);
        let (bot_state_tx, bot_state_rx) = watch::channel(state.bot_state());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let cooldown_wake = Arc::new(Notify::new());

        let handle = StoreHandle::new(command_tx, bot_state_rx.clone(), event_bus.clone());

        let store_worker = StoreWorker::new(
            state,
            config.game_config.clone(),
            Arc::clone(&self.clock),
            command_rx,
            bot_state_tx,
            shutdown_rx.clone(),
        );
        let store_worker_handle = tokio::spawn(async move {
            store_worker.run().await;
        });

        let dispatcher = ActionDispatcher::new(
            chat,
            notifier,
            event_bus,
            config.game_chat_id,
            &config.game_config,
            bot_state_rx,
            Arc::clone(&cooldown_wake),
        );

        let router = MessageRouter::new(
            handle.clone(),
            dispatcher.clone(),
            config.game_chat_id,
            config.guild_chat_id,
            config.report_chat_id,
        );
        let router_handle = self.inbound.map(|inbound| {
            let router = router.clone();
            let shutdown_rx = shutdown_rx.clone();
            tokio::spawn(async move {
                router.run(inbound, shutdown_rx).await;
            })
        });

        let driver = GameLoopDriver::new(
            handle.clone(),
            dispatcher,
            cooldown_wake,
            shutdown_rx,
            &config,
        );
        let driver_handle = tokio::spawn(async move {
            driver.run().await;
        });

        tracing::info!(
            target: "runtime::driver",
            game_chat_id = config.game_chat_id,
            guild_chat_id = config.guild_chat_id,
            autostart = config.autostart,
            "runtime started"
        );

        Ok(Runtime {
            handle,
            router,
            shutdown_tx,
            store_worker_handle,
            driver_handle,
            router_handle,
        })
    }
}
