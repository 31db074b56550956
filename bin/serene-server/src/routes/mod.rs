//! Axum router construction.
//!
//! [`build`] assembles the complete application router: the single relay
//! route plus the CORS and per-request trace layers.

mod chat;

use std::sync::Arc;

use axum::{Router, middleware};
use tower::ServiceBuilder;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(chat::router())
        // Trace wraps CORS so preflight answers are logged too.
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(trace::trace_middleware))
                .layer(cors::cors_layer(&state)),
        )
        .with_state(state)
}
