//! Console stand-in for a real chat transport.
//!
//! Outbound messages are printed to stdout. Inbound messages are typed on
//! stdin as `<chat_id> <text>`; a literal `\n` in the text becomes a newline
//! so multi-line game replies can be pasted on one line.
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use runtime::{ChatClient, ChatMessage, TransportError};

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleChatClient;

#[async_trait]
impl ChatClient for ConsoleChatClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        println!("→ [{chat_id}] {}", text.replace('\n', "\n    "));
        Ok(())
    }
}

/// Parses one console line; `None` for blank or malformed lines.
pub fn parse_line(line: &str) -> Option<ChatMessage> {
    let (chat_id, text) = line.trim().split_once(char::is_whitespace)?;
    let chat_id = chat_id.parse::<i64>().ok()?;
    let text = text.trim().replace("\\n", "\n");
    if text.is_empty() {
        return None;
    }
    Some(ChatMessage::incoming(chat_id, text))
}

/// Forwards stdin lines to the runtime until EOF or the runtime goes away.
pub async fn forward_stdin(inbound: mpsc::Sender<ChatMessage>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(message) = parse_line(&line) else {
            warn!("expected `<chat_id> <text>`, got {line:?}");
            continue;
        };
        if inbound.send(message).await.is_err() {
            debug!("runtime closed the inbound channel");
            break;
        }
    }
    Ok(())
}
