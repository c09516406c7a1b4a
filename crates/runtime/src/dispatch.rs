//! Action dispatcher and reporter.
//!
//! Executes policy intents against the chat collaborators. Game commands are
//! scheduled on their own tasks after a jittered pacing delay so they never
//! hold up message processing; replies and reports go out in order. Transport
//! failures are logged and swallowed.
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{Notify, watch};
use tracing::{debug, warn};

use game_core::{BotState, GameConfig, Intent, LogLevel, Report};

use crate::api::{ChatClient, Notifier, ReportContext};
use crate::events::{Event, EventBus, OutboundEvent, OutboundKind, ReportEvent, ReportOutcome};

#[derive(Clone)]
pub struct ActionDispatcher {
    chat: Arc<dyn ChatClient>,
    notifier: Arc<dyn Notifier>,
    event_bus: EventBus,
    game_chat_id: i64,
    explore_command: String,
    status_command: String,
    pacing: (Duration, Duration),
    bot_state_rx: watch::Receiver<BotState>,
    cooldown_wake: Arc<Notify>,
}

impl ActionDispatcher {
    pub(crate) fn new(
        chat: Arc<dyn ChatClient>,
        notifier: Arc<dyn Notifier>,
        event_bus: EventBus,
        game_chat_id: i64,
        config: &GameConfig,
        bot_state_rx: watch::Receiver<BotState>,
        cooldown_wake: Arc<Notify>,
    ) -> Self {
        Self {
            chat,
            notifier,
            event_bus,
            game_chat_id,
            explore_command: config.explore_command.clone(),
            status_command: config.status_command.clone(),
            pacing: config.pacing_bounds(),
            bot_state_rx,
            cooldown_wake,
        }
    }

    /// Executes intents in order.
    pub async fn dispatch(&self, intents: Vec<Intent>, context: &ReportContext) {
        for intent in intents {
            self.dispatch_one(intent, context).await;
        }
    }

    async fn dispatch_one(&self, intent: Intent, context: &ReportContext) {
        match intent {
            Intent::SendExplore { delay } => {
                self.schedule(self.explore_command.clone(), OutboundKind::Explore, delay);
            }
            Intent::SendStatusCheck { delay } => {
                self.schedule(self.status_command.clone(), OutboundKind::StatusCheck, delay);
            }
            Intent::StartCooldown { minutes } => {
                debug!(target: "runtime::dispatch", minutes, "cooldown armed, waking driver");
                self.cooldown_wake.notify_one();
            }
            Intent::Report(report) => self.report(report, context).await,
            Intent::Reply { chat_id, text } => {
                let sent = match self.chat.send_text(chat_id, &text).await {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(target: "runtime::dispatch", chat_id, error = %err, "reply failed");
                        false
                    }
                };
                self.event_bus.publish(Event::Outbound(OutboundEvent {
                    chat_id,
                    text,
                    kind: OutboundKind::Reply,
                    sent,
                }));
            }
        }
    }

    async fn report(&self, report: Report, context: &ReportContext) {
        if context.log_level == LogLevel::ImportantOnly && !report.is_important() {
            debug!(target: "runtime::dispatch", kind = %report.kind, "report filtered by log level");
            self.event_bus.publish(Event::Report(ReportEvent {
                report,
                text: String::new(),
                outcome: ReportOutcome::Filtered,
            }));
            return;
        }

        let text = format!("{}\n\n{}", report.kind, context.status);
        let outcome = match self.notifier.report(context.reporting_chat_id, &text).await {
            Ok(()) => ReportOutcome::Delivered,
            Err(err) => {
                warn!(target: "runtime::dispatch", error = %err, "report delivery failed");
                ReportOutcome::Failed
            }
        };
        self.event_bus.publish(Event::Report(ReportEvent {
            report,
            text,
            outcome,
        }));
    }

    /// Sends `text` to the game chat after the pacing delay, unless the bot
    /// was stopped in the meantime.
    fn schedule(&self, text: String, kind: OutboundKind, min_delay: Duration) {
        let delay = self.pacing_delay(min_delay);
        let chat = Arc::clone(&self.chat);
        let event_bus = self.event_bus.clone();
        let bot_state_rx = self.bot_state_rx.clone();
        let chat_id = self.game_chat_id;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let sent = if *bot_state_rx.borrow() != BotState::Running {
                debug!(target: "runtime::dispatch", ?kind, "bot stopped, dropping scheduled command");
                false
            } else {
                match chat.send_text(chat_id, &text).await {
                    Ok(()) => {
                        debug!(target: "runtime::dispatch", ?kind, delay_ms = delay.as_millis() as u64, "command sent");
                        true
                    }
                    Err(err) => {
                        warn!(target: "runtime::dispatch", chat_id, error = %err, "command send failed");
                        false
                    }
                }
            };

            event_bus.publish(Event::Outbound(OutboundEvent {
                chat_id,
                text,
                kind,
                sent,
            }));
        });
    }

    /// Uniform jitter between the requested minimum and the pacing ceiling.
    fn pacing_delay(&self, min_delay: Duration) -> Duration {
        let (floor, ceiling) = self.pacing;
        let low = min_delay.max(floor);
        let high = ceiling.max(low);
        if low == high {
            return low;
        }
        let millis = rand::thread_rng().gen_range(low.as_millis()..=high.as_millis());
        Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
    }
}
