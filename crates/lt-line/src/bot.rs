//! LINE bot
//!
//! Wires the vendor clients, the message handler and the webhook router
//! together and runs the server.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use lt_core::Config;

use crate::error::{LineError, Result};
use crate::handler::MessageHandler;
use crate::webhook::{WebhookState, create_webhook_router};

/// LINE translation bot
pub struct LineBot {
    config: Config,
    handler: Arc<MessageHandler>,
}

impl LineBot {
    /// Create a new LINE bot.
    ///
    /// Fails when the LINE credentials are missing or the static directory
    /// cannot be created.
    pub fn new(config: Config) -> Result<Self> {
        if config.line.channel_secret.is_empty() {
            return Err(LineError::Config(
                "LINE channel secret not configured (line.channel_secret / LINE_CHANNEL_SECRET)"
                    .to_string(),
            ));
        }
        if config.line.channel_access_token.is_empty() {
            return Err(LineError::Config(
                "LINE channel access token not configured (line.channel_access_token / LINE_CHANNEL_ACCESS_TOKEN)"
                    .to_string(),
            ));
        }

        std::fs::create_dir_all(&config.server.static_dir)?;

        let handler = Arc::new(MessageHandler::from_config(&config)?);

        Ok(Self { config, handler })
    }

    /// Application router
    pub fn router(&self) -> Router {
        let state = WebhookState {
            channel_secret: self.config.line.channel_secret.clone(),
            handler: self.handler.clone(),
        };
        create_webhook_router(state, &self.config.server.static_dir)
    }

    /// Run the webhook server until `shutdown` fires
    pub async fn run(&self, mut shutdown: tokio::sync::broadcast::Receiver<()>) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| LineError::Webhook(e.to_string()))?;

        info!("LINE webhook server listening on {}", addr);
        info!("Serving audio from: {}", self.config.server.static_dir);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                info!("LINE bot shutting down");
            })
            .await
            .map_err(|e| LineError::Webhook(e.to_string()))?;

        Ok(())
    }
}
