//! The client-side conversation log.

use tokio::sync::watch;
use tracing::warn;

use crate::message::ChatMessage;
use crate::relay::RelayTransport;

/// First message of every conversation.
pub const GREETING: &str = "Hello! I'm your personal wellness assistant. How are you feeling today?";

/// Assistant message used when the relay service cannot be reached or
/// answers with something unreadable.
pub const UNREACHABLE_REPLY: &str = "Sorry, I couldn't reach the server.";

/// Conversation starters offered while only the greeting is present.
pub const SUGGESTED_PROMPTS: [&str; 5] = [
    "I'm feeling anxious about work",
    "Help me understand my mood patterns",
    "I need coping strategies for stress",
    "How can I improve my sleep?",
    "Dealing with relationship issues",
];

/// In-memory, append-only chat log for one session.
///
/// `send` takes `&mut self`, so a conversation can have at most one relay
/// call in flight.  Nothing is persisted; dropping the value ends the session.
pub struct Conversation {
    messages: Vec<ChatMessage>,
    input: String,
    composing: watch::Sender<bool>,
}

/// Holds the composing flag up for the duration of a relay call.
struct ComposingGuard<'a>(&'a watch::Sender<bool>);

impl<'a> ComposingGuard<'a> {
    fn engage(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self(flag)
    }
}

impl Drop for ComposingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

impl Conversation {
    pub fn new() -> Self {
        let (composing, _) = watch::channel(false);
        Self {
            messages: vec![ChatMessage::assistant(1, GREETING)],
            input: String::new(),
            composing,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// The pending-input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Copy suggestion `index` into the input buffer.
    pub fn use_suggestion(&mut self, index: usize) -> Option<&'static str> {
        let prompt = SUGGESTED_PROMPTS.get(index).copied()?;
        self.input = prompt.to_owned();
        Some(prompt)
    }

    /// Suggestions are only offered before the user has said anything.
    pub fn shows_suggestions(&self) -> bool {
        self.messages.len() == 1
    }

    /// Whether a relay call is in flight.
    pub fn is_composing(&self) -> bool {
        *self.composing.borrow()
    }

    /// Subscribe to composing-flag changes, e.g. to drive a typing indicator.
    pub fn watch_composing(&self) -> watch::Receiver<bool> {
        self.composing.subscribe()
    }

    /// Send the pending-input buffer.
    pub async fn submit<R>(&mut self, relay: &R) -> Option<&ChatMessage>
    where
        R: RelayTransport + ?Sized,
    {
        let text = self.input.clone();
        self.send(relay, &text).await
    }

    /// Append `text` as a user message, relay it, and append exactly one
    /// assistant message with the outcome.
    ///
    /// Blank input is ignored and returns `None`.  Otherwise the returned
    /// message is the assistant entry just appended: the model's reply, the
    /// service's own error reply, or [`UNREACHABLE_REPLY`].
    pub async fn send<R>(&mut self, relay: &R, text: &str) -> Option<&ChatMessage>
    where
        R: RelayTransport + ?Sized,
    {
        if text.trim().is_empty() {
            return None;
        }

        let user_id = self.next_id();
        self.messages.push(ChatMessage::user(user_id, text));
        self.input.clear();

        let composing = ComposingGuard::engage(&self.composing);

        let reply = match relay.relay(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "relay call failed");
                e.reply().unwrap_or(UNREACHABLE_REPLY).to_owned()
            }
        };

        let reply_id = self.next_id();
        self.messages.push(ChatMessage::assistant(reply_id, reply));
        drop(composing);

        self.messages.last()
    }

    /// Ids follow the log position.  Only unique within this session.
    fn next_id(&self) -> u64 {
        self.messages.len() as u64 + 1
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
