//! Upstream generative-language providers.
//!
//! The relay handler only sees [`ChatProvider`]: raw text in, complete text
//! out.  Transport, serialization and vendor details stay in the
//! implementations.

mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use thiserror::Error;

/// Everything that can go wrong on one upstream call.
///
/// These are logged by the relay and never shown to the caller.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced a response (connect failure, timeout, ...).
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    /// The provider refused to answer the prompt.
    #[error("upstream blocked the response: {0}")]
    Blocked(String),

    /// The provider returned prompt feedback but no candidate to read.
    #[error("upstream returned no candidates")]
    Empty,
}

/// A hosted model that turns a single prompt into a single complete reply.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send `prompt` verbatim and return the model's text output unmodified.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
