//! Unified relay error type.
//!
//! The chat handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`].  Every error becomes a `{"reply": ...}`
//! body carrying one of the fixed strings from `serene_types`, so provider
//! messages, keys or response bodies never reach the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serene_types::{NO_MESSAGE_REPLY, RelayResponse, UPSTREAM_FAILURE_REPLY};
use thiserror::Error;
use tracing::error;

use crate::provider::ProviderError;

/// All errors that can occur in one relay call.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request body had no usable `message`.
    #[error("no message was provided")]
    NoMessage,

    /// The upstream model call failed.
    #[error("upstream failure: {0}")]
    Upstream(#[from] ProviderError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NoMessage => StatusCode::BAD_REQUEST,
            ServerError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The fixed, human-readable reply for this error.
    pub fn reply(&self) -> &'static str {
        match self {
            ServerError::NoMessage => NO_MESSAGE_REPLY,
            ServerError::Upstream(_) => UPSTREAM_FAILURE_REPLY,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if let ServerError::Upstream(e) = &self {
            error!(error = %e, "error calling upstream model");
        }
        (self.status(), Json(RelayResponse::new(self.reply()))).into_response()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
