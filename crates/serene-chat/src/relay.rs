//! Transport between the chat client and the relay service.

use async_trait::async_trait;
use serene_types::{CHAT_PATH, RelayRequest, RelayResponse};
use thiserror::Error;
use tracing::debug;

/// Ways a relay call can fail, as seen from the client.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The HTTP client could not be constructed (e.g. no usable TLS backend).
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The service could not be reached, or the connection broke mid-call.
    #[error("relay service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The service answered with an error status and a readable reply.
    #[error("relay service answered {status}: {reply}")]
    Rejected { status: u16, reply: String },

    /// The service answered with a body that is not `{"reply": string}`.
    #[error("relay service sent an unreadable body: {0}")]
    Malformed(String),
}

impl RelayError {
    /// The human-readable reply the service chose for this failure, if any.
    ///
    /// A readable error answer (the 400 or 500 apology) is shown to the user
    /// as is, so a service-side failure reads differently from an unreachable
    /// service.  Only the failures without a reply fall back to the generic
    /// "couldn't reach the server" text.
    pub fn reply(&self) -> Option<&str> {
        match self {
            RelayError::Rejected { reply, .. } => Some(reply),
            _ => None,
        }
    }
}

/// One relay call: a message in, the assistant's reply text out.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn relay(&self, message: &str) -> Result<String, RelayError>;
}

/// [`RelayTransport`] over HTTP to a running relay service.
///
/// No timeout is applied: a call waits until the service answers or the
/// connection fails.
pub struct HttpRelay {
    client: reqwest::Client,
    url: String,
}

impl HttpRelay {
    /// `base_url` is the service root, e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("serene-chat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RelayError::Client)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), CHAT_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for HttpRelay {
    async fn relay(&self, message: &str) -> Result<String, RelayError> {
        let response = self
            .client
            .post(&self.url)
            .json(&RelayRequest::new(message))
            .send()
            .await
            .map_err(RelayError::Unreachable)?;

        let status = response.status();
        let body = response.bytes().await.map_err(RelayError::Unreachable)?;
        let decoded: RelayResponse =
            serde_json::from_slice(&body).map_err(|e| RelayError::Malformed(e.to_string()))?;
        debug!(status = status.as_u16(), reply_len = decoded.reply.len(), "relay answered");

        if status.is_success() {
            Ok(decoded.reply)
        } else {
            Err(RelayError::Rejected {
                status: status.as_u16(),
                reply: decoded.reply,
            })
        }
    }
}
