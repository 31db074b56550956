//! Wire contract between the chat client and the relay service.
//!
//! One route, JSON in and JSON out:
//!
//! ```text
//! POST /chat   {"message": "..."}  ->  {"reply": "..."}
//! ```
//!
//! Every response body, success or failure, is a [`RelayResponse`].

use serde::{Deserialize, Serialize};

/// Path of the single relay route.
pub const CHAT_PATH: &str = "/chat";

/// Reply sent with HTTP 400 when the request carries no usable message.
pub const NO_MESSAGE_REPLY: &str = "Error: No message was provided.";

/// Reply sent with HTTP 500 when the upstream model call fails for any reason.
pub const UPSTREAM_FAILURE_REPLY: &str = "Sorry, something went wrong with the AI service.";

/// Request body for `POST /chat`.
///
/// `message` is optional on the wire so that an omitted field and an explicit
/// `null` both deserialize; the service rejects either one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl RelayRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The message text, if present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Response body for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub reply: String,
}

impl RelayResponse {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn omitted_and_null_message_have_no_text() {
        let omitted: RelayRequest = serde_json::from_str("{}").unwrap();
        let null: RelayRequest = serde_json::from_str(r#"{"message": null}"#).unwrap();
        assert_eq!(omitted.text(), None);
        assert_eq!(null.text(), None);
    }

    #[test]
    fn empty_message_has_no_text() {
        let req: RelayRequest = serde_json::from_str(r#"{"message": ""}"#).unwrap();
        assert_eq!(req.message.as_deref(), Some(""));
        assert_eq!(req.text(), None);
    }

    #[test]
    fn whitespace_message_is_kept_verbatim() {
        let req = RelayRequest::new("  hi  ");
        assert_eq!(req.text(), Some("  hi  "));
    }

    #[test]
    fn request_serializes_as_message_object() {
        let body = serde_json::to_value(RelayRequest::new("I feel anxious")).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "I feel anxious" }));
    }

    #[test]
    fn response_serializes_as_reply_object() {
        let body = serde_json::to_value(RelayResponse::new(NO_MESSAGE_REPLY)).unwrap();
        assert_eq!(body["reply"], "Error: No message was provided.");
    }
}
