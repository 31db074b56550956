//! serene-server: relays one chat message at a time to a hosted
//! generative-language model.
//!
//! The binary in `main.rs` wires these modules together; the library exists
//! so the router can be driven in-process by tests and by the chat client's
//! integration tests.

pub mod config;
pub mod error;
pub mod middleware;
pub mod provider;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::ServerError;
pub use provider::{ChatProvider, GeminiProvider, ProviderError};
pub use state::AppState;
