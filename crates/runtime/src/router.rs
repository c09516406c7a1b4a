//! Inbound message router.
//!
//! Filters the chat stream down to messages the bot should act on, runs each
//! through the store, and hands the resulting intents to the dispatcher.
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, trace};

use game_core::{Decision, Origin};

use crate::api::{ChatMessage, Result, StoreHandle};
use crate::dispatch::ActionDispatcher;

#[derive(Clone)]
pub struct MessageRouter {
    store: StoreHandle,
    dispatcher: ActionDispatcher,
    game_chat_id: i64,
    guild_chat_id: i64,
    report_chat_id: i64,
}

impl MessageRouter {
    pub(crate) fn new(
        store: StoreHandle,
        dispatcher: ActionDispatcher,
        game_chat_id: i64,
        guild_chat_id: i64,
        report_chat_id: i64,
    ) -> Self {
        Self {
            store,
            dispatcher,
            game_chat_id,
            guild_chat_id,
            report_chat_id,
        }
    }

    /// Classifies `message`, or `None` when the bot should not act on it.
    ///
    /// Game and guild chat messages are processed; control commands are also
    /// taken from the reporting chat. The bot's own echoes are skipped unless
    /// they are commands, so the explore command it sends is never re-read.
    pub fn origin(&self, message: &ChatMessage) -> Option<Origin> {
        let command = message.is_command();
        if message.outgoing && !command {
            return None;
        }
        if message.chat_id == self.game_chat_id {
            Some(Origin::Game)
        } else if message.chat_id == self.guild_chat_id {
            Some(Origin::Guild)
        } else if command && message.chat_id == self.report_chat_id {
            Some(Origin::Owner)
        } else {
            None
        }
    }

    /// Processes one message; `Ok(None)` when it was filtered out.
    pub async fn route(&self, message: ChatMessage) -> Result<Option<Decision>> {
        let Some(origin) = self.origin(&message) else {
            trace!(target: "runtime::router", chat_id = message.chat_id, "message ignored");
            return Ok(None);
        };

        let handled = self
            .store
            .handle_message(origin, message.chat_id, message.text)
            .await?;
        debug!(
            target: "runtime::router",
            %origin,
            chat_id = message.chat_id,
            rule = handled.decision.rule.unwrap_or("none"),
            intents = handled.decision.intents.len(),
            "message handled"
        );

        self.dispatcher
            .dispatch(handled.decision.intents.clone(), &handled.context)
            .await;
        Ok(Some(handled.decision))
    }

    /// Consumes the inbound stream until it closes or shutdown is signalled.
    pub async fn run(
        self,
        mut inbound: mpsc::Receiver<ChatMessage>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                message = inbound.recv() => {
                    let Some(message) = message else { break };
                    if let Err(err) = self.route(message).await {
                        // The core stays usable; only this message is lost.
                        error!(target: "runtime::router", error = %err, "message could not be processed");
                    }
                }
                _ = shutdown_rx.changed() => break,
            }
        }
        debug!(target: "runtime::router", "router stopped");
    }
}
