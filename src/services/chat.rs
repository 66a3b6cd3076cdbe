use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::models::{Chat, Message, MessageType};
use crate::services::delay::Sleeper;

/// Stub chat service.
///
/// No transport exists yet: sending fabricates the message record locally
/// and loading always returns an empty history after the simulated wait.
pub struct ChatService {
    sleeper: Arc<dyn Sleeper>,
    send_latency: Duration,
    load_latency: Duration,
}

impl ChatService {
    pub fn new(sleeper: Arc<dyn Sleeper>, send_latency: Duration, load_latency: Duration) -> Self {
        Self {
            sleeper,
            send_latency,
            load_latency,
        }
    }

    /// "Send" a text message and return the record the caller can append
    /// to its local history.
    pub async fn send_message(&self, sender_id: &str, receiver_id: &str, content: &str) -> Message {
        self.sleeper.sleep(self.send_latency).await;

        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
            message_type: MessageType::Text,
        };
        debug!("sent message {} to {}", message.id, receiver_id);
        message
    }

    /// Load message history with a user. Always empty until a backend
    /// exists.
    pub async fn load_messages(&self, user_id: &str) -> Vec<Message> {
        self.sleeper.sleep(self.load_latency).await;
        debug!("loaded empty history with {}", user_id);
        Vec::new()
    }

    /// Load the chat list. Always empty until a backend exists.
    pub async fn load_chats(&self) -> Vec<Chat> {
        self.sleeper.sleep(self.load_latency).await;
        debug!("loaded empty chat list");
        Vec::new()
    }
}
