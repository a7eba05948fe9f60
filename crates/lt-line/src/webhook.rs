//! Webhook server for the LINE bot
//!
//! Handles incoming webhooks from the LINE Messaging API and serves the
//! synthesized audio LINE fetches afterwards.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, warn};

use crate::handler::MessageHandler;
use crate::types::WebhookBody;

type HmacSha256 = Hmac<Sha256>;

/// Webhook server state
#[derive(Clone)]
pub struct WebhookState {
    pub channel_secret: String,
    pub handler: Arc<MessageHandler>,
}

/// Create the application router: webhook, static audio and health check
pub fn create_webhook_router(state: WebhookState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/callback", post(handle_webhook))
        .route("/health", get(|| async { "OK" }))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Handle incoming webhook
async fn handle_webhook(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, StatusCode> {
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing x-line-signature header");
            StatusCode::BAD_REQUEST
        })?;

    if !verify_signature(&state.channel_secret, &body, signature) {
        warn!("Invalid signature");
        return Err(StatusCode::BAD_REQUEST);
    }

    debug!("Request body: {}", String::from_utf8_lossy(&body));

    let webhook: WebhookBody = serde_json::from_slice(&body).map_err(|e| {
        error!("Failed to parse webhook body: {:?}", e);
        StatusCode::BAD_REQUEST
    })?;

    debug!("Received {} events for destination: {}", webhook.events.len(), webhook.destination);

    for event in webhook.events {
        if let Err(e) = state.handler.process_event(&event).await {
            error!("Error processing event: {:?}", e);
        }
    }

    Ok("OK")
}

/// Verify a LINE signature: base64 HMAC-SHA256 of the raw body keyed by
/// the channel secret, compared in constant time.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };

    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}
