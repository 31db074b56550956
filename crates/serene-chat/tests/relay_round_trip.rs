//! End-to-end: `Conversation` + `HttpRelay` against an in-process
//! `serene-server` whose upstream provider is a stub.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serene_chat::{Conversation, HttpRelay, RelayError, RelayTransport, Sender, UNREACHABLE_REPLY};
use serene_server::config::API_KEY_VAR;
use serene_server::{AppState, ChatProvider, Config, ProviderError, routes};
use serene_types::{NO_MESSAGE_REPLY, UPSTREAM_FAILURE_REPLY};

enum Behaviour {
    Fixed(&'static str),
    Echo,
    Fail,
}

struct StubProvider {
    behaviour: Behaviour,
    calls: AtomicUsize,
}

#[async_trait]
impl ChatProvider for StubProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Fixed(reply) => Ok(reply.to_owned()),
            Behaviour::Echo => {
                // Let concurrent calls overlap inside the provider.
                tokio::time::sleep(Duration::from_millis(25)).await;
                Ok(format!("echo: {prompt}"))
            }
            Behaviour::Fail => Err(ProviderError::Empty),
        }
    }
}

/// Start a relay service on an ephemeral port and return its base URL.
async fn spawn_server(behaviour: Behaviour) -> (String, Arc<StubProvider>) {
    let provider = Arc::new(StubProvider { behaviour, calls: AtomicUsize::new(0) });
    let config = Config::from_lookup(|k| (k == API_KEY_VAR).then(|| "test-key".to_owned())).unwrap();
    let app = routes::build(Arc::new(AppState::new(config, provider.clone())));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), provider)
}

#[tokio::test]
async fn conversation_receives_model_reply() {
    let (base, provider) = spawn_server(Behaviour::Fixed("Name three things you can see.")).await;
    let relay = HttpRelay::new(&base).unwrap();
    let mut conv = Conversation::new();

    conv.send(&relay, "I feel anxious").await;

    let log = conv.messages();
    assert_eq!(log.len(), 3);
    assert_eq!(log[1].sender, Sender::User);
    assert_eq!(log[1].text, "I feel anxious");
    assert_eq!(log[2].sender, Sender::Assistant);
    assert_eq!(log[2].text, "Name three things you can see.");
    assert!(!conv.is_composing());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn upstream_failure_shows_service_apology() {
    let (base, _) = spawn_server(Behaviour::Fail).await;
    let relay = HttpRelay::new(&base).unwrap();

    let err = relay.relay("hello").await.unwrap_err();
    assert!(matches!(err, RelayError::Rejected { status: 500, .. }), "got {err:?}");
    assert_eq!(err.reply(), Some(UPSTREAM_FAILURE_REPLY));

    let mut conv = Conversation::new();
    let reply = conv.send(&relay, "hello").await.cloned().unwrap();
    assert_eq!(reply.text, UPSTREAM_FAILURE_REPLY);
}

#[tokio::test]
async fn empty_message_is_rejected_before_upstream() {
    let (base, provider) = spawn_server(Behaviour::Fixed("unused")).await;
    let err = HttpRelay::new(&base).unwrap().relay("").await.unwrap_err();
    assert!(matches!(err, RelayError::Rejected { status: 400, .. }), "got {err:?}");
    assert_eq!(err.reply(), Some(NO_MESSAGE_REPLY));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_server_falls_back() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let relay = HttpRelay::new(&format!("http://{addr}")).unwrap();
    let err = relay.relay("hello").await.unwrap_err();
    assert!(matches!(err, RelayError::Unreachable(_)), "got {err:?}");

    let mut conv = Conversation::new();
    let reply = conv.send(&relay, "hello").await.cloned().unwrap();
    assert_eq!(reply.text, UNREACHABLE_REPLY);
    assert_eq!(conv.messages().len(), 3);
    assert!(!conv.is_composing());
}

#[tokio::test]
async fn replayed_message_gets_identical_reply() {
    let (base, provider) = spawn_server(Behaviour::Fixed("Breathe in for four.")).await;
    let relay = HttpRelay::new(&base).unwrap();
    for _ in 0..3 {
        assert_eq!(relay.relay("same words").await.unwrap(), "Breathe in for four.");
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn simultaneous_calls_get_their_own_replies() {
    let (base, _) = spawn_server(Behaviour::Echo).await;
    let relay = HttpRelay::new(&base).unwrap();

    let (a, b) = tokio::join!(relay.relay("morning walk"), relay.relay("evening journal"));
    assert_eq!(a.unwrap(), "echo: morning walk");
    assert_eq!(b.unwrap(), "echo: evening journal");
}
