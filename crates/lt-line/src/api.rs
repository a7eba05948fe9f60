//! LINE Messaging API client
//!
//! Sends replies and pushes back to LINE.

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{LineError, Result};
use crate::types::*;

/// LINE Messaging API client
#[derive(Clone)]
pub struct LineApiClient {
    client: Client,
    channel_access_token: String,
    base_url: String,
}

impl LineApiClient {
    /// Create a new LINE API client
    pub fn new(channel_access_token: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(LineError::HttpError)?;

        Ok(Self {
            client,
            channel_access_token: channel_access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<()> {
        let url = format!("{}/bot/message/{}", self.base_url, endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.channel_access_token)
            .json(body)
            .send()
            .await
            .map_err(LineError::HttpError)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("LINE {} failed: {} - {}", endpoint, status, error_text);
            return Err(LineError::ApiError(format!("{}: {}", status, error_text)));
        }

        Ok(())
    }

    /// Reply to an event with up to five messages
    pub async fn reply_messages(&self, reply_token: &str, messages: &[MessageContent]) -> Result<()> {
        if messages.len() > MAX_MESSAGES_PER_REQUEST {
            return Err(LineError::ApiError(format!(
                "reply carries {} messages, LINE accepts at most {}",
                messages.len(),
                MAX_MESSAGES_PER_REQUEST
            )));
        }

        debug!("Replying with {} messages", messages.len());

        let body = ReplyMessage {
            reply_token: reply_token.to_string(),
            messages: messages.to_vec(),
        };
        self.post("reply", &body).await
    }

    /// Push messages to a user/group/room, five per request
    pub async fn push_messages(&self, to: &str, messages: &[MessageContent]) -> Result<()> {
        for chunk in messages.chunks(MAX_MESSAGES_PER_REQUEST) {
            debug!("Pushing {} messages to: {}", chunk.len(), to);

            let body = PushMessage {
                to: to.to_string(),
                messages: chunk.to_vec(),
            };
            self.post("push", &body).await?;
        }

        Ok(())
    }
}
