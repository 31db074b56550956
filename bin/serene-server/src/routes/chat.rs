//! The relay route (`POST /chat`).
//!
//! Forwards the user's message verbatim to the configured provider and wraps
//! the model's text in `{"reply": ...}`.  No history, no system prompt, no
//! retries: every call stands alone.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serene_types::{CHAT_PATH, RelayRequest, RelayResponse};
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::state::AppState;

/// Register the relay route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(CHAT_PATH, post(relay))
}

/// Relay one message to the upstream model.
///
/// A body that cannot be read as `{"message": string | null}` is answered the
/// same way as a missing message, before the provider is touched.
pub async fn relay(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayResponse>, ServerError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "unreadable relay request");
            return Err(ServerError::NoMessage);
        }
    };

    let message = request.text().ok_or(ServerError::NoMessage)?;
    info!(message_len = message.len(), "received message");
    debug!(message = %message, "relay prompt");

    let reply = state.provider.generate(message).await?;

    info!(reply_len = reply.len(), "sending reply");
    debug!(reply = %reply, "relay reply");
    Ok(Json(RelayResponse::new(reply)))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
