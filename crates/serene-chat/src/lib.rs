//! Chat client for the serene relay service.
//!
//! [`Conversation`] owns the in-memory message log and drives one relay call
//! at a time through a [`RelayTransport`]; [`HttpRelay`] is the transport that
//! talks to a running `serene-server`.

pub mod conversation;
pub mod message;
pub mod relay;

pub use conversation::{Conversation, GREETING, SUGGESTED_PROMPTS, UNREACHABLE_REPLY};
pub use message::{ChatMessage, Sender};
pub use relay::{HttpRelay, RelayError, RelayTransport};
