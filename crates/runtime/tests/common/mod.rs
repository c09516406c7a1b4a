//! In-memory collaborators and a runtime harness shared by integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use game_core::GameConfig;
use runtime::{
    ChatClient, ChatMessage, MessageRouter, Notifier, Runtime, RuntimeConfig, StoreHandle,
    TransportError,
};

pub const GAME: i64 = -1001;
pub const GUILD: i64 = -1002;
pub const OWNER: i64 = 42;

pub const SHEET: &str = "⚔️ Karl Shinobi - Рівень 8\n\
                         ❤️ Здоров'я: 300/300\n\
                         ⚡ Енергія: 5/10\n\
                         💰 Золото: 277\n\
                         ✨ Досвід: 393/1500";

/// Chat client that records every send.
#[derive(Clone, Default)]
pub struct RecordingChat {
    sent: Arc<Mutex<Vec<(i64, String)>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingChat {
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text)
            .collect()
    }

    pub fn count_to(&self, chat_id: i64, text: &str) -> usize {
        self.texts_to(chat_id).iter().filter(|t| *t == text).count()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChatClient for RecordingChat {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::Send {
                chat_id,
                message: "offline".into(),
            });
        }
        self.sent.lock().unwrap().push((chat_id, text.to_owned()));
        Ok(())
    }
}

/// Notifier that records every delivered report.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    reports: Arc<Mutex<Vec<(i64, String)>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn texts(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn chats(&self) -> Vec<i64> {
        self.reports.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }

    pub fn any_starts_with(&self, prefix: &str) -> bool {
        self.texts().iter().any(|text| text.starts_with(prefix))
    }

    pub fn clear(&self) {
        self.reports.lock().unwrap().clear();
    }

    pub fn fail_reports(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn report(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::Report {
                chat_id,
                message: "offline".into(),
            });
        }
        self.reports.lock().unwrap().push((chat_id, text.to_owned()));
        Ok(())
    }
}

pub struct Harness {
    pub runtime: Runtime,
    pub router: MessageRouter,
    pub handle: StoreHandle,
    pub chat: RecordingChat,
    pub notifier: RecordingNotifier,
}

impl Harness {
    pub async fn game(&self, text: &str) {
        self.router
            .route(ChatMessage::incoming(GAME, text))
            .await
            .expect("route game message");
    }

    pub async fn guild(&self, text: &str) {
        self.router
            .route(ChatMessage::incoming(GUILD, text))
            .await
            .expect("route guild message");
    }

    pub async fn owner(&self, text: &str) {
        self.router
            .route(ChatMessage::incoming(OWNER, text))
            .await
            .expect("route owner command");
    }

    /// `/start` followed by a full character sheet.
    pub async fn start_with_sheet(&self) {
        self.owner("/start").await;
        self.game(SHEET).await;
    }
}

pub fn test_config() -> RuntimeConfig {
    RuntimeConfig {
        game_chat_id: GAME,
        guild_chat_id: GUILD,
        report_chat_id: OWNER,
        ..RuntimeConfig::default()
    }
}

pub async fn harness() -> Harness {
    harness_with(test_config()).await
}

pub async fn harness_with(config: RuntimeConfig) -> Harness {
    let chat = RecordingChat::default();
    let notifier = RecordingNotifier::default();
    let runtime = Runtime::builder()
        .config(config)
        .chat_client(chat.clone())
        .notifier(notifier.clone())
        .build()
        .await
        .expect("runtime builds");

    Harness {
        router: runtime.router(),
        handle: runtime.handle(),
        runtime,
        chat,
        notifier,
    }
}

/// Lets scheduled commands (at most the max pacing delay) fire.
pub async fn settle() {
    tokio::time::sleep(Duration::from_secs(3)).await;
}

pub fn explore_command() -> String {
    GameConfig::EXPLORE_COMMAND.to_owned()
}

pub fn status_command() -> String {
    GameConfig::STATUS_COMMAND.to_owned()
}
