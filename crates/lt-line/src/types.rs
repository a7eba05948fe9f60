//! LINE Messaging API types

use serde::{Deserialize, Serialize};

/// Maximum number of messages LINE accepts in one reply or push
pub const MAX_MESSAGES_PER_REQUEST: usize = 5;

/// Message inside a webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Event source (user, group, or room)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

/// Webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    pub timestamp: i64,
    pub source: LineSource,
    #[serde(default)]
    pub message: Option<LineMessage>,
}

impl LineEvent {
    /// Text of a text-message event
    pub fn text(&self) -> Option<&str> {
        if self.event_type != "message" {
            return None;
        }
        let message = self.message.as_ref()?;
        if message.message_type != "text" {
            return None;
        }
        message.text.as_deref()
    }
}

/// Webhook request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookBody {
    pub destination: String,
    pub events: Vec<LineEvent>,
}

/// Reply message request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyMessage {
    #[serde(rename = "replyToken")]
    pub reply_token: String,
    pub messages: Vec<MessageContent>,
}

/// Push message request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    pub to: String,
    pub messages: Vec<MessageContent>,
}

/// Outbound message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub enum MessageContent {
    Text {
        text: String,
    },
    Audio {
        #[serde(rename = "originalContentUrl")]
        original_content_url: String,
        /// Length in milliseconds
        duration: u64,
    },
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn audio(url: impl Into<String>, duration: u64) -> Self {
        Self::Audio {
            original_content_url: url.into(),
            duration,
        }
    }
}
